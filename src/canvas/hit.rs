//! Pointer hit testing in canvas space.

use super::geometry::{input_handle, node_rect, output_handle, EdgePath, Point};
use crate::config::CanvasSettings;
use crate::graph::{EdgeId, GraphModel, NodeId};

/// Half the width of the invisible stroke that makes edges clickable.
pub const EDGE_HIT_TOLERANCE: f64 = 10.0;

/// What lies under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Background,
    NodeBody(NodeId),
    InputHandle(NodeId),
    OutputHandle(NodeId),
    Edge(EdgeId),
}

impl HitTarget {
    pub fn node(&self) -> Option<&NodeId> {
        match self {
            HitTarget::NodeBody(id) | HitTarget::InputHandle(id) | HitTarget::OutputHandle(id) => {
                Some(id)
            }
            _ => None,
        }
    }
}

/// Find the element under canvas point `p`.
///
/// Nodes later in the list are drawn on top, so they are tested first. Handles
/// win over bodies; edges are only considered when no node is hit.
pub fn hit_test(graph: &GraphModel, p: Point, settings: &CanvasSettings) -> HitTarget {
    let radius = settings.handle_radius;

    for node in graph.nodes().iter().rev() {
        if output_handle(node.position, settings).distance(p) <= radius {
            return HitTarget::OutputHandle(node.id.clone());
        }
        if input_handle(node.position, settings).distance(p) <= radius {
            return HitTarget::InputHandle(node.id.clone());
        }
        if node_rect(node, settings).contains(p) {
            return HitTarget::NodeBody(node.id.clone());
        }
    }

    for edge in graph.edges().iter().rev() {
        let (Some(source), Some(target)) = (graph.node(&edge.source), graph.node(&edge.target))
        else {
            continue;
        };
        if EdgePath::between(source, target, settings).distance_to(p) <= EDGE_HIT_TOLERANCE {
            return HitTarget::Edge(edge.id.clone());
        }
    }

    HitTarget::Background
}
