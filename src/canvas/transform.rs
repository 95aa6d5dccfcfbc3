//! Pan/zoom transform between canvas space and screen space.

use serde::{Deserialize, Serialize};

use super::geometry::{nodes_bounds, Point, Viewport};
use crate::config::CanvasSettings;
use crate::graph::Node;

/// `screen = canvas * scale + (x, y)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn translation(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn screen_to_canvas(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.scale, (p.y - self.y) / self.scale)
    }

    pub fn canvas_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.x, p.y * self.scale + self.y)
    }

    /// Rescale while keeping the canvas point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Point, new_scale: f64) {
        let ratio = new_scale / self.scale;
        self.x = anchor.x - (anchor.x - self.x) * ratio;
        self.y = anchor.y - (anchor.y - self.y) * ratio;
        self.scale = new_scale;
    }

    /// Zoom percentage as shown next to the zoom buttons.
    pub fn zoom_percent(&self) -> i64 {
        (self.scale * 100.0).round() as i64
    }

    pub fn zoom_label(&self) -> String {
        format!("{}%", self.zoom_percent())
    }

    /// Transform that centres all nodes in `viewport` at the largest scale
    /// not above 1. `None` when there is nothing to fit.
    pub fn fit(nodes: &[Node], viewport: Viewport, settings: &CanvasSettings) -> Option<Self> {
        if viewport.is_empty() {
            return None;
        }
        let bounds = nodes_bounds(nodes, settings)?;

        let padding = settings.fit_padding;
        let scale_x = (viewport.width - padding * 2.0) / bounds.width();
        let scale_y = (viewport.height - padding * 2.0) / bounds.height();
        let scale = scale_x.min(scale_y).min(1.0).max(settings.min_scale);

        Some(Self {
            x: (viewport.width - bounds.width() * scale) / 2.0 - bounds.min.x * scale,
            y: (viewport.height - bounds.height() * scale) / 2.0 - bounds.min.y * scale,
            scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeData, NodeId, Position};

    fn node_at(x: f64, y: f64) -> Node {
        Node {
            id: NodeId::from("n"),
            node_type: "data".into(),
            position: Position::new(x, y),
            data: NodeData::default(),
        }
    }

    #[test]
    fn test_screen_canvas_inverse() {
        let t = Transform {
            x: 30.0,
            y: -12.0,
            scale: 0.5,
        };
        let p = Point::new(123.0, 45.0);
        let back = t.canvas_to_screen(t.screen_to_canvas(p));
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut t = Transform {
            x: 40.0,
            y: 10.0,
            scale: 1.0,
        };
        let anchor = Point::new(200.0, 150.0);
        let before = t.screen_to_canvas(anchor);
        t.zoom_at(anchor, 1.35);
        let after = t.screen_to_canvas(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_fit_empty_is_none() {
        let settings = CanvasSettings::default();
        assert!(Transform::fit(&[], Viewport::new(800.0, 600.0), &settings).is_none());
    }

    #[test]
    fn test_fit_small_graph_centred_at_unit_scale() {
        let settings = CanvasSettings::default();
        let t = Transform::fit(&[node_at(100.0, 100.0)], Viewport::new(800.0, 600.0), &settings)
            .unwrap();
        assert_eq!(t.scale, 1.0);
        let centre = t.canvas_to_screen(Point::new(200.0, 140.0));
        assert!((centre.x - 400.0).abs() < 1e-9);
        assert!((centre.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_large_graph_shrinks() {
        let settings = CanvasSettings::default();
        let nodes = [node_at(0.0, 0.0), node_at(1800.0, 0.0)];
        let t = Transform::fit(&nodes, Viewport::new(1100.0, 600.0), &settings).unwrap();
        // width 2000 into 1000 usable pixels
        assert!((t.scale - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_label() {
        let t = Transform {
            scale: 0.854,
            ..Transform::default()
        };
        assert_eq!(t.zoom_label(), "85%");
    }
}
