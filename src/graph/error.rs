//! Graph-specific error types.

use crate::graph::id::{EdgeId, NodeId};
use thiserror::Error;

/// Rejected graph mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Cannot connect node {0} to itself")]
    SelfConnection(NodeId),

    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    #[error("Unknown edge {0}")]
    UnknownEdge(EdgeId),

    #[error("Cycle detected in pipeline")]
    CycleDetected,
}

/// Errors raised while parsing pasted or loaded pipeline JSON.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Please paste JSON data")]
    Empty,

    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),

    #[error("Invalid model format: missing nodes array")]
    MissingNodes,

    #[error("Invalid model format: {0}")]
    InvalidShape(String),
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;
