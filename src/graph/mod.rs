//! Pipeline graph: nodes, edges, id allocation and ordering.

mod document;
mod error;
mod id;
mod model;
mod node;
pub mod topo;

pub use document::PipelineDocument;
pub use error::{GraphError, GraphResult, ImportError};
pub use id::{EdgeId, IdAllocator, NodeId};
pub use model::{ConnectOutcome, GraphModel, GraphSnapshot};
pub use node::{Edge, Node, NodeData, ParamValue, Parameters, Position};
pub use topo::{has_cycle, lenient_order, topological_order, CyclePolicy};
