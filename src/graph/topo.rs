//! Topological ordering of pipeline nodes using Kahn's algorithm.
//!
//! The same sort serves validation, export ordering and the simulator. They
//! differ only in what happens to nodes stuck on a cycle, selected through
//! [`CyclePolicy`].

use std::collections::{HashMap, VecDeque};

use super::error::{GraphError, GraphResult};
use super::id::NodeId;
use super::node::{Edge, Node};

/// What to do with nodes that never reach in-degree zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Fail with [`GraphError::CycleDetected`].
    Strict,
    /// Append the remaining nodes in their original order.
    AppendRemaining,
}

/// Order `nodes` so every edge points forward.
///
/// Edges whose endpoints are not in `nodes` are ignored. Ties are broken by
/// the original node order.
pub fn topological_order(
    nodes: &[Node],
    edges: &[Edge],
    policy: CyclePolicy,
) -> GraphResult<Vec<NodeId>> {
    let n = nodes.len();
    let index: HashMap<&NodeId, usize> = nodes.iter().enumerate().map(|(i, n)| (&n.id, i)).collect();

    let mut adj = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];

    for edge in edges {
        let (Some(&from), Some(&to)) = (index.get(&edge.source), index.get(&edge.target)) else {
            continue;
        };
        adj[from].push(to);
        in_degree[to] += 1;
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    while let Some(node) = queue.pop_front() {
        visited[node] = true;
        order.push(node);

        for &neighbor in &adj[node] {
            in_degree[neighbor] -= 1;
            if in_degree[neighbor] == 0 {
                queue.push_back(neighbor);
            }
        }
    }

    if order.len() < n {
        match policy {
            CyclePolicy::Strict => return Err(GraphError::CycleDetected),
            CyclePolicy::AppendRemaining => {
                order.extend((0..n).filter(|&i| !visited[i]));
            }
        }
    }

    Ok(order.into_iter().map(|i| nodes[i].id.clone()).collect())
}

/// Lenient order: cycle members are appended instead of failing.
pub fn lenient_order(nodes: &[Node], edges: &[Edge]) -> Vec<NodeId> {
    // AppendRemaining never errors
    topological_order(nodes, edges, CyclePolicy::AppendRemaining).unwrap_or_default()
}

pub fn has_cycle(nodes: &[Node], edges: &[Edge]) -> bool {
    topological_order(nodes, edges, CyclePolicy::Strict).is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::id::EdgeId;
    use crate::graph::node::{NodeData, Position};

    fn node(id: &str) -> Node {
        Node {
            id: NodeId::from(id),
            node_type: "data".into(),
            position: Position::default(),
            data: NodeData::default(),
        }
    }

    fn edge(id: &str, s: &str, t: &str) -> Edge {
        Edge {
            id: EdgeId::from(id),
            source: NodeId::from(s),
            target: NodeId::from(t),
        }
    }

    fn ids(order: &[NodeId]) -> Vec<&str> {
        order.iter().map(NodeId::as_str).collect()
    }

    #[test]
    fn test_linear_chain_reversed_storage() {
        let nodes = vec![node("d"), node("c"), node("b"), node("a")];
        let edges = vec![edge("e1", "a", "b"), edge("e2", "b", "c"), edge("e3", "c", "d")];

        let order = topological_order(&nodes, &edges, CyclePolicy::Strict).unwrap();
        assert_eq!(ids(&order), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_ties_keep_node_order() {
        let nodes = vec![node("x"), node("y"), node("z")];
        let edges = vec![edge("e1", "x", "z")];

        let order = topological_order(&nodes, &edges, CyclePolicy::Strict).unwrap();
        assert_eq!(ids(&order), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_cycle_strict_fails() {
        let nodes = vec![node("a"), node("b")];
        let edges = vec![edge("e1", "a", "b"), edge("e2", "b", "a")];

        assert_eq!(
            topological_order(&nodes, &edges, CyclePolicy::Strict),
            Err(GraphError::CycleDetected)
        );
        assert!(has_cycle(&nodes, &edges));
    }

    #[test]
    fn test_cycle_lenient_appends_in_original_order() {
        let nodes = vec![node("c1"), node("src"), node("c2")];
        let edges = vec![
            edge("e1", "src", "c1"),
            edge("e2", "c1", "c2"),
            edge("e3", "c2", "c1"),
        ];

        assert_eq!(ids(&lenient_order(&nodes, &edges)), vec!["src", "c1", "c2"]);
    }

    #[test]
    fn test_dangling_edges_ignored() {
        let nodes = vec![node("a")];
        let edges = vec![edge("e1", "ghost", "a")];

        assert!(!has_cycle(&nodes, &edges));
        assert_eq!(ids(&lenient_order(&nodes, &edges)), vec!["a"]);
    }
}
