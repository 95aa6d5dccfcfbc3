//! Render-ready view of the graph and the render target seam.
//!
//! A [`CanvasSession`](super::CanvasSession) never draws. It builds a [`Scene`]
//! in canvas coordinates and pushes it, together with transient state such as
//! the connection guide and notifications, into a [`RenderTarget`].

use super::geometry::{input_handle, node_rect, output_handle, EdgePath, Point, Rect};
use super::transform::Transform;
use crate::config::CanvasSettings;
use crate::graph::{EdgeId, GraphModel, Node, NodeId};
use crate::history::HistoryStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeShape {
    pub id: NodeId,
    pub label: String,
    pub icon: String,
    pub icon_name: Option<String>,
    pub rect: Rect,
    pub input: Point,
    pub output: Point,
}

impl NodeShape {
    pub fn from_node(node: &Node, settings: &CanvasSettings) -> Self {
        Self {
            id: node.id.clone(),
            label: node.data.label.clone(),
            icon: node.data.icon.clone(),
            icon_name: node.data.icon_name.clone(),
            rect: node_rect(node, settings),
            input: input_handle(node.position, settings),
            output: output_handle(node.position, settings),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeShape {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub path: EdgePath,
}

/// Everything needed to draw the graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub nodes: Vec<NodeShape>,
    pub edges: Vec<EdgeShape>,
}

impl Scene {
    /// Edges with a missing endpoint are left out.
    pub fn build(graph: &GraphModel, settings: &CanvasSettings) -> Self {
        Self {
            nodes: graph
                .nodes()
                .iter()
                .map(|n| NodeShape::from_node(n, settings))
                .collect(),
            edges: edge_shapes(graph, settings, |_| true),
        }
    }

    pub fn node(&self, id: &NodeId) -> Option<&NodeShape> {
        self.nodes.iter().find(|n| &n.id == id)
    }
}

/// Shapes for the renderable edges accepted by `filter`.
pub fn edge_shapes(
    graph: &GraphModel,
    settings: &CanvasSettings,
    filter: impl Fn(&crate::graph::Edge) -> bool,
) -> Vec<EdgeShape> {
    graph
        .edges()
        .iter()
        .filter(|e| filter(e))
        .filter_map(|edge| {
            let source = graph.node(&edge.source)?;
            let target = graph.node(&edge.target)?;
            Some(EdgeShape {
                id: edge.id.clone(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                path: EdgePath::between(source, target, settings),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Sink for everything a session wants shown.
pub trait RenderTarget {
    /// Full redraw after any structural change.
    fn render(&mut self, scene: &Scene);

    /// A node moved; only it and its incident edges need redrawing.
    fn node_moved(&mut self, _node: &NodeShape, _edges: &[EdgeShape]) {}

    fn set_transform(&mut self, _transform: &Transform) {}

    /// Guide curve while connecting, `None` to clear it.
    fn set_guide(&mut self, _guide: Option<EdgePath>) {}

    /// Selected node; `None` hides the property panel.
    fn select(&mut self, _node: Option<&NodeId>) {}

    fn notify(&mut self, _notification: Notification) {}

    fn history_changed(&mut self, _status: &HistoryStatus) {}
}

/// Retains the latest state pushed by a session.
///
/// Used by the egui canvas, which repaints every frame anyway, and by tests.
#[derive(Debug, Default)]
pub struct SceneBuffer {
    pub scene: Scene,
    pub transform: Transform,
    pub guide: Option<EdgePath>,
    pub selected: Option<NodeId>,
    pub history: Option<HistoryStatus>,
    pub notifications: Vec<Notification>,
    pub full_renders: usize,
    pub partial_renders: usize,
}

impl SceneBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take pending notifications, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn last_message(&self) -> Option<&str> {
        self.notifications.last().map(|n| n.message.as_str())
    }
}

impl RenderTarget for SceneBuffer {
    fn render(&mut self, scene: &Scene) {
        self.scene = scene.clone();
        self.full_renders += 1;
    }

    fn node_moved(&mut self, node: &NodeShape, edges: &[EdgeShape]) {
        if let Some(shape) = self.scene.nodes.iter_mut().find(|n| n.id == node.id) {
            *shape = node.clone();
        }
        for edge in edges {
            if let Some(shape) = self.scene.edges.iter_mut().find(|e| e.id == edge.id) {
                *shape = edge.clone();
            }
        }
        self.partial_renders += 1;
    }

    fn set_transform(&mut self, transform: &Transform) {
        self.transform = *transform;
    }

    fn set_guide(&mut self, guide: Option<EdgePath>) {
        self.guide = guide;
    }

    fn select(&mut self, node: Option<&NodeId>) {
        self.selected = node.cloned();
    }

    fn notify(&mut self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error | NotificationLevel::Warning => {
                tracing::warn!("{}", notification.message)
            }
            _ => tracing::info!("{}", notification.message),
        }
        self.notifications.push(notification);
    }

    fn history_changed(&mut self, status: &HistoryStatus) {
        self.history = Some(status.clone());
    }
}
