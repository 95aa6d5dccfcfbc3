//! Identity types for the pipeline graph.
//!
//! Node and edge ids are strings on the wire (`node-3`, `edge-7`) so saved
//! models and templates stay compatible with the backend. Allocation is driven
//! by explicit integer counters held in [`IdAllocator`], which are persisted
//! next to the graph instead of being re-derived from id text on every load.

use serde::{Deserialize, Serialize};
use std::fmt;

const NODE_PREFIX: &str = "node-";
const EDGE_PREFIX: &str = "edge-";

/// Identifier of a node on the canvas.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_counter(n: u64) -> Self {
        Self(format!("{NODE_PREFIX}{n}"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing decimal digits of the id, if any.
    pub fn numeric_suffix(&self) -> Option<u64> {
        trailing_number(&self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of a connection between two nodes.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_counter(n: u64) -> Self {
        Self(format!("{EDGE_PREFIX}{n}"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn numeric_suffix(&self) -> Option<u64> {
        trailing_number(&self.0)
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

fn trailing_number(s: &str) -> Option<u64> {
    let digits_start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    s[digits_start..].parse().ok()
}

/// Monotonic counters for node and edge ids.
///
/// `last_node`/`last_edge` hold the most recently issued number; the next
/// allocation uses `last + 1`. Counters only move backwards through
/// [`IdAllocator::reset_from`], which is reserved for wholesale graph loads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdAllocator {
    pub last_node: u64,
    pub last_edge: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next node id, skipping any id for which `taken` returns true.
    pub fn next_node(&mut self, taken: impl Fn(&NodeId) -> bool) -> NodeId {
        loop {
            self.last_node += 1;
            let id = NodeId::from_counter(self.last_node);
            if !taken(&id) {
                return id;
            }
        }
    }

    /// Issue the next edge id, skipping any id for which `taken` returns true.
    pub fn next_edge(&mut self, taken: impl Fn(&EdgeId) -> bool) -> EdgeId {
        loop {
            self.last_edge += 1;
            let id = EdgeId::from_counter(self.last_edge);
            if !taken(&id) {
                return id;
            }
        }
    }

    /// Recompute both counters from the ids present in a freshly loaded graph.
    pub fn reset_from<'a>(
        &mut self,
        nodes: impl IntoIterator<Item = &'a NodeId>,
        edges: impl IntoIterator<Item = &'a EdgeId>,
    ) {
        self.last_node = nodes
            .into_iter()
            .filter_map(NodeId::numeric_suffix)
            .max()
            .unwrap_or(0);
        self.last_edge = edges
            .into_iter()
            .filter_map(EdgeId::numeric_suffix)
            .max()
            .unwrap_or(0);
    }

    /// Raise the counters so they cover every id in `nodes`/`edges`.
    pub fn observe<'a>(
        &mut self,
        nodes: impl IntoIterator<Item = &'a NodeId>,
        edges: impl IntoIterator<Item = &'a EdgeId>,
    ) {
        let mut probe = IdAllocator::new();
        probe.reset_from(nodes, edges);
        self.last_node = self.last_node.max(probe.last_node);
        self.last_edge = self.last_edge.max(probe.last_edge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_format() {
        let id = NodeId::from_counter(42);
        assert_eq!(id.as_str(), "node-42");
        assert_eq!(id.numeric_suffix(), Some(42));
    }

    #[test]
    fn test_numeric_suffix_only_trailing_digits() {
        assert_eq!(NodeId::from("n1-node-7").numeric_suffix(), Some(7));
        assert_eq!(NodeId::from("loader").numeric_suffix(), None);
        assert_eq!(EdgeId::from("e12").numeric_suffix(), Some(12));
    }

    #[test]
    fn test_allocator_skips_taken_ids() {
        let mut ids = IdAllocator::new();
        let taken = NodeId::from_counter(1);
        let id = ids.next_node(|candidate| *candidate == taken);
        assert_eq!(id.as_str(), "node-2");
        assert_eq!(ids.last_node, 2);
    }

    #[test]
    fn test_reset_and_observe() {
        let nodes = [NodeId::from("node-3"), NodeId::from("node-9")];
        let edges = [EdgeId::from("edge-4")];

        let mut ids = IdAllocator::new();
        ids.reset_from(&nodes, &edges);
        assert_eq!(ids.last_node, 9);
        assert_eq!(ids.last_edge, 4);

        let mut ids = IdAllocator {
            last_node: 20,
            last_edge: 1,
        };
        ids.observe(&nodes, &edges);
        assert_eq!(ids.last_node, 20);
        assert_eq!(ids.last_edge, 4);
    }

    #[test]
    fn test_reset_empty_graph() {
        let mut ids = IdAllocator {
            last_node: 5,
            last_edge: 5,
        };
        ids.reset_from(&[] as &[NodeId], &[] as &[EdgeId]);
        assert_eq!(ids, IdAllocator::default());
    }
}
