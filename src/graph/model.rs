//! In-memory pipeline graph and its primitive mutations.
//!
//! `GraphModel` enforces the structural invariants (no self loops, at most one
//! edge per ordered pair, cascading deletes). It knows nothing about history
//! or rendering; [`crate::canvas::CanvasSession`] composes those around it.

use serde::{Deserialize, Serialize};

use super::error::{GraphError, GraphResult};
use super::id::{EdgeId, IdAllocator, NodeId};
use super::node::{Edge, Node, NodeData, ParamValue, Position};
use crate::catalog::Component;

/// Immutable copy of the full node/edge set at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Result of a connection attempt that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A new edge was appended.
    Connected(Edge),
    /// An edge with the same (source, target) already exists.
    Duplicate(EdgeId),
}

/// The pipeline graph.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    ids: IdAllocator,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from loaded parts, deriving id counters from the ids present.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut graph = Self {
            nodes,
            edges,
            ids: IdAllocator::new(),
        };
        graph.ids.reset_from(
            graph.nodes.iter().map(|n| &n.id),
            graph.edges.iter().map(|e| &e.id),
        );
        graph
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn ids(&self) -> IdAllocator {
        self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    /// Edges whose target is `id`.
    pub fn incoming<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.target == id)
    }

    /// Edges whose source is `id`.
    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.source == id)
    }

    pub fn has_edge(&self, source: &NodeId, target: &NodeId) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| &e.source == source && &e.target == target)
    }

    /// Append a node for `component` at canvas position (`x`, `y`).
    ///
    /// Parameters are seeded from the component's declared defaults.
    pub fn add_node(&mut self, component: &Component, x: f64, y: f64) -> Node {
        let nodes = &self.nodes;
        let id = self
            .ids
            .next_node(|candidate| nodes.iter().any(|n| &n.id == candidate));

        let node = Node {
            id,
            node_type: component.node_type.clone(),
            position: Position::new(x, y),
            data: NodeData {
                component_id: component.id.clone(),
                label: component.name.clone(),
                icon: component.icon.clone(),
                icon_name: Some(component.icon_name().to_string()),
                parameters: component.default_parameters(),
            },
        };
        self.nodes.push(node.clone());
        node
    }

    /// Remove a node and every edge incident to it.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|n| &n.id == id)?;
        let node = self.nodes.remove(index);
        self.edges.retain(|e| &e.source != id && &e.target != id);
        Some(node)
    }

    /// Connect `source`'s output to `target`'s input.
    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> GraphResult<ConnectOutcome> {
        if source == target {
            return Err(GraphError::SelfConnection(source.clone()));
        }
        for id in [source, target] {
            if !self.contains_node(id) {
                return Err(GraphError::UnknownNode(id.clone()));
            }
        }
        if let Some(existing) = self.has_edge(source, target) {
            return Ok(ConnectOutcome::Duplicate(existing.id.clone()));
        }

        let edges = &self.edges;
        let id = self
            .ids
            .next_edge(|candidate| edges.iter().any(|e| &e.id == candidate));
        let edge = Edge {
            id,
            source: source.clone(),
            target: target.clone(),
        };
        self.edges.push(edge.clone());
        Ok(ConnectOutcome::Connected(edge))
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let index = self.edges.iter().position(|e| &e.id == id)?;
        Some(self.edges.remove(index))
    }

    /// Merge a single parameter value into a node's parameter map.
    pub fn set_parameter(
        &mut self,
        node_id: &NodeId,
        key: impl Into<String>,
        value: ParamValue,
    ) -> GraphResult<()> {
        let node = self
            .node_mut(node_id)
            .ok_or_else(|| GraphError::UnknownNode(node_id.clone()))?;
        node.data.parameters.insert(key.into(), value);
        Ok(())
    }

    pub fn move_node(&mut self, id: &NodeId, position: Position) -> GraphResult<()> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
        node.position = position;
        Ok(())
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Restore a history snapshot. Counters are only ever raised here so that
    /// ids already handed out in this session are never reissued.
    pub fn restore(&mut self, snapshot: GraphSnapshot) {
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges;
        self.ids.observe(
            self.nodes.iter().map(|n| &n.id),
            self.edges.iter().map(|e| &e.id),
        );
    }

    /// Replace the whole graph (template, import, saved model).
    pub fn replace(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        *self = Self::from_parts(nodes, edges);
    }

    /// Replace the graph and adopt persisted counters, never going below the
    /// ids actually present.
    pub fn replace_with_ids(&mut self, nodes: Vec<Node>, edges: Vec<Edge>, ids: IdAllocator) {
        self.replace(nodes, edges);
        self.ids.last_node = self.ids.last_node.max(ids.last_node);
        self.ids.last_edge = self.ids.last_edge.max(ids.last_edge);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentLibrary;

    fn component(id: &str) -> Component {
        ComponentLibrary::builtin()
            .get(id)
            .cloned()
            .expect("builtin component")
    }

    fn edge_pairs(graph: &GraphModel) -> Vec<(String, String)> {
        graph
            .edges()
            .iter()
            .map(|e| (e.source.to_string(), e.target.to_string()))
            .collect()
    }

    #[test]
    fn test_add_node_seeds_defaults() {
        let mut graph = GraphModel::new();
        let node = graph.add_node(&component("train-test-split"), 10.0, 20.0);

        assert_eq!(node.id.as_str(), "node-1");
        assert_eq!(node.data.label, "Train/Test Split");
        assert_eq!(node.data.parameters["test_size"], ParamValue::Float(0.2));
        assert_eq!(graph.nodes().len(), 1);
    }

    #[test]
    fn test_node_ids_not_reused_after_delete() {
        let mut graph = GraphModel::new();
        let loader = component("csv-loader");
        let a = graph.add_node(&loader, 0.0, 0.0);
        let b = graph.add_node(&loader, 0.0, 0.0);
        graph.remove_node(&b.id);
        let c = graph.add_node(&loader, 0.0, 0.0);

        assert_eq!(a.id.as_str(), "node-1");
        assert_eq!(c.id.as_str(), "node-3");
    }

    #[test]
    fn test_connect_rejects_self() {
        let mut graph = GraphModel::new();
        let a = graph.add_node(&component("csv-loader"), 0.0, 0.0);

        let result = graph.connect(&a.id, &a.id);
        assert_eq!(result, Err(GraphError::SelfConnection(a.id.clone())));
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_connect_duplicate_reported() {
        let mut graph = GraphModel::new();
        let a = graph.add_node(&component("csv-loader"), 0.0, 0.0);
        let b = graph.add_node(&component("standard-scaler"), 0.0, 0.0);

        let first = graph.connect(&a.id, &b.id).unwrap();
        let ConnectOutcome::Connected(edge) = first else {
            panic!("expected a new edge");
        };
        let second = graph.connect(&a.id, &b.id).unwrap();

        assert_eq!(second, ConnectOutcome::Duplicate(edge.id));
        assert_eq!(graph.edges().len(), 1);
    }

    #[test]
    fn test_connect_unknown_node() {
        let mut graph = GraphModel::new();
        let a = graph.add_node(&component("csv-loader"), 0.0, 0.0);
        let ghost = NodeId::from("node-99");

        assert_eq!(
            graph.connect(&a.id, &ghost),
            Err(GraphError::UnknownNode(ghost))
        );
    }

    #[test]
    fn test_delete_node_cascades_only_incident_edges() {
        let mut graph = GraphModel::new();
        let loader = component("csv-loader");
        let a = graph.add_node(&loader, 0.0, 0.0);
        let b = graph.add_node(&loader, 0.0, 0.0);
        let c = graph.add_node(&loader, 0.0, 0.0);
        graph.connect(&a.id, &b.id).unwrap();
        graph.connect(&b.id, &c.id).unwrap();
        graph.connect(&a.id, &c.id).unwrap();

        graph.remove_node(&b.id);

        assert_eq!(
            edge_pairs(&graph),
            vec![("node-1".to_string(), "node-3".to_string())]
        );
    }

    #[test]
    fn test_edge_ids_not_reused_after_delete() {
        let mut graph = GraphModel::new();
        let loader = component("csv-loader");
        let a = graph.add_node(&loader, 0.0, 0.0);
        let b = graph.add_node(&loader, 0.0, 0.0);
        let c = graph.add_node(&loader, 0.0, 0.0);
        let ConnectOutcome::Connected(e1) = graph.connect(&a.id, &b.id).unwrap() else {
            panic!("expected a new edge");
        };
        let ConnectOutcome::Connected(e2) = graph.connect(&b.id, &c.id).unwrap() else {
            panic!("expected a new edge");
        };
        graph.remove_edge(&e1.id);
        let ConnectOutcome::Connected(e3) = graph.connect(&a.id, &c.id).unwrap() else {
            panic!("expected a new edge");
        };

        assert_ne!(e3.id, e2.id);
        assert_eq!(e3.id.as_str(), "edge-3");
    }

    #[test]
    fn test_set_parameter_merges() {
        let mut graph = GraphModel::new();
        let node = graph.add_node(&component("random-forest-classifier"), 0.0, 0.0);
        graph
            .set_parameter(&node.id, "n_estimators", ParamValue::Int(250))
            .unwrap();

        let stored = graph.node(&node.id).unwrap();
        assert_eq!(stored.data.parameters["n_estimators"], ParamValue::Int(250));
        assert!(stored.data.parameters.contains_key("max_depth"));
    }

    #[test]
    fn test_restore_never_lowers_counter() {
        let mut graph = GraphModel::new();
        let loader = component("csv-loader");
        let empty = graph.snapshot();
        graph.add_node(&loader, 0.0, 0.0);
        graph.add_node(&loader, 0.0, 0.0);

        graph.restore(empty);
        let next = graph.add_node(&loader, 0.0, 0.0);
        assert_eq!(next.id.as_str(), "node-3");
    }

    #[test]
    fn test_replace_recomputes_counter() {
        let mut graph = GraphModel::new();
        let loaded = GraphModel::from_parts(
            vec![Node {
                id: NodeId::from("node-7"),
                node_type: "data".into(),
                position: Position::default(),
                data: NodeData::default(),
            }],
            vec![],
        );
        graph.replace(loaded.nodes().to_vec(), vec![]);
        let next = graph.add_node(&component("csv-loader"), 0.0, 0.0);
        assert_eq!(next.id.as_str(), "node-8");
    }
}
