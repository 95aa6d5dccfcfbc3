//! Canvas geometry: points, node footprints, handles and edge curves.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use crate::config::CanvasSettings;
use crate::graph::{Node, Position};

/// A 2D point, in screen or canvas space depending on context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn scale(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<Position> for Point {
    fn from(p: Position) -> Self {
        Point::new(p.x, p.y)
    }
}

impl From<Point> for Position {
    fn from(p: Point) -> Self {
        Position::new(p.x, p.y)
    }
}

/// Size of the visible canvas area in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_min_size(min: Point, width: f64, height: f64) -> Self {
        Self {
            min,
            max: Point::new(min.x + width, min.y + height),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn union(self, other: Rect) -> Rect {
        Rect {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

/// Footprint of a node; identical for every node type.
pub fn node_rect(node: &Node, settings: &CanvasSettings) -> Rect {
    Rect::from_min_size(node.position.into(), settings.node_width, settings.node_height)
}

/// Output handle sits at the right-middle of the footprint.
pub fn output_handle(position: Position, settings: &CanvasSettings) -> Point {
    Point::new(
        position.x + settings.node_width,
        position.y + settings.node_height / 2.0,
    )
}

/// Input handle sits at the left-middle of the footprint.
pub fn input_handle(position: Position, settings: &CanvasSettings) -> Point {
    Point::new(position.x, position.y + settings.node_height / 2.0)
}

/// Bounding box of all node footprints, `None` for an empty slice.
pub fn nodes_bounds(nodes: &[Node], settings: &CanvasSettings) -> Option<Rect> {
    nodes
        .iter()
        .map(|n| node_rect(n, settings))
        .reduce(Rect::union)
}

/// Cubic Bézier from an output handle to an input handle (or the pointer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePath {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl EdgePath {
    /// Control points are pushed `curve_offset` rightwards from the start and
    /// leftwards from the end.
    pub fn new(start: Point, end: Point, curve_offset: f64) -> Self {
        Self {
            start,
            control1: Point::new(start.x + curve_offset, start.y),
            control2: Point::new(end.x - curve_offset, end.y),
            end,
        }
    }

    pub fn between(source: &Node, target: &Node, settings: &CanvasSettings) -> Self {
        Self::new(
            output_handle(source.position, settings),
            input_handle(target.position, settings),
            settings.curve_offset,
        )
    }

    /// SVG path data, e.g. `M 200 40 C 250 40, 250 140, 300 140`.
    pub fn svg(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }

    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let tt = t * t;
        let uu = u * u;
        Point::new(
            uu * u * self.start.x
                + 3.0 * uu * t * self.control1.x
                + 3.0 * u * tt * self.control2.x
                + tt * t * self.end.x,
            uu * u * self.start.y
                + 3.0 * uu * t * self.control1.y
                + 3.0 * u * tt * self.control2.y
                + tt * t * self.end.y,
        )
    }

    /// Polyline approximation with `segments + 1` points.
    pub fn sample(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f64 / segments as f64))
            .collect()
    }

    /// Approximate distance from `p` to the curve.
    pub fn distance_to(&self, p: Point) -> f64 {
        self.sample(32)
            .windows(2)
            .map(|w| distance_to_segment(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min)
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab.scale(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeData, NodeId};

    fn node_at(x: f64, y: f64) -> Node {
        Node {
            id: NodeId::from("n"),
            node_type: "data".into(),
            position: Position::new(x, y),
            data: NodeData::default(),
        }
    }

    #[test]
    fn test_handles_and_svg_path() {
        let settings = CanvasSettings::default();
        let a = node_at(0.0, 0.0);
        let b = node_at(300.0, 100.0);

        let path = EdgePath::between(&a, &b, &settings);
        assert_eq!(path.start, Point::new(200.0, 40.0));
        assert_eq!(path.end, Point::new(300.0, 140.0));
        assert_eq!(path.svg(), "M 200 40 C 250 40, 250 140, 300 140");
    }

    #[test]
    fn test_sample_endpoints() {
        let path = EdgePath::new(Point::new(0.0, 0.0), Point::new(100.0, 50.0), 50.0);
        let points = path.sample(16);
        assert_eq!(points.len(), 17);
        assert_eq!(points[0], path.start);
        assert_eq!(points[16], path.end);
    }

    #[test]
    fn test_distance_to_curve() {
        let path = EdgePath::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 50.0);
        assert!(path.distance_to(Point::new(50.0, 0.0)) < 1e-6);
        assert!((path.distance_to(Point::new(50.0, 10.0)) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_bounds() {
        let settings = CanvasSettings::default();
        assert!(nodes_bounds(&[], &settings).is_none());

        let bounds = nodes_bounds(&[node_at(0.0, 0.0), node_at(400.0, -20.0)], &settings).unwrap();
        assert_eq!(bounds.min, Point::new(0.0, -20.0));
        assert_eq!(bounds.max, Point::new(600.0, 80.0));
    }
}
