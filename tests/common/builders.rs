//! Test data builders for creating pipelines

use mlcanvas::graph::{ConnectOutcome, Edge, GraphModel, Node, NodeId};
use mlcanvas::ComponentLibrary;

/// Builder for graphs of builtin components
pub struct PipelineBuilder {
    library: ComponentLibrary,
    graph: GraphModel,
    x: f64,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            library: ComponentLibrary::builtin(),
            graph: GraphModel::new(),
            x: 100.0,
        }
    }

    /// Append a node, laid out left to right.
    pub fn node(mut self, component_id: &str) -> Self {
        self.push(component_id);
        self
    }

    /// Append each component and connect it to the previously added node.
    pub fn chain(mut self, component_ids: &[&str]) -> Self {
        let mut previous: Option<NodeId> = self.graph.nodes().last().map(|n| n.id.clone());
        for id in component_ids {
            let node = self.push(id);
            if let Some(prev) = previous {
                self.link(&prev, &node.id);
            }
            previous = Some(node.id);
        }
        self
    }

    /// Connect the nodes at positions `from` and `to` (insertion order).
    pub fn connect(mut self, from: usize, to: usize) -> Self {
        let source = self.graph.nodes()[from].id.clone();
        let target = self.graph.nodes()[to].id.clone();
        self.link(&source, &target);
        self
    }

    pub fn build(self) -> GraphModel {
        self.graph
    }

    fn push(&mut self, component_id: &str) -> Node {
        let component = self
            .library
            .get(component_id)
            .unwrap_or_else(|| panic!("unknown builtin component {component_id}"))
            .clone();
        let node = self.graph.add_node(&component, self.x, 100.0);
        self.x += 300.0;
        node
    }

    fn link(&mut self, source: &NodeId, target: &NodeId) -> Edge {
        match self.graph.connect(source, target) {
            Ok(ConnectOutcome::Connected(edge)) => edge,
            other => panic!("expected a new edge {source} -> {target}, got {other:?}"),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Loader, scaler, split and random forest, connected in that order.
pub fn classification_chain() -> GraphModel {
    PipelineBuilder::new()
        .chain(&[
            "csv-loader",
            "standard-scaler",
            "train-test-split",
            "random-forest-classifier",
        ])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_builder() {
        let graph = classification_chain();
        assert_eq!(graph.nodes().len(), 4);
        assert_eq!(graph.edges().len(), 3);
    }
}
