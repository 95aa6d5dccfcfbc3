//! Whole-pipeline documents: pasted imports, JSON exports and saved models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ImportError;
use super::id::IdAllocator;
use super::node::{Edge, Node};

/// A pipeline as exchanged with files and the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    /// Id counters; absent in templates and documents written by other tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<IdAllocator>,
}

impl PipelineDocument {
    /// Parse user-pasted JSON.
    ///
    /// Nothing is applied to any graph here, so a rejected import can never
    /// leave partial state behind.
    pub fn parse_import(text: &str) -> Result<Self, ImportError> {
        if text.trim().is_empty() {
            return Err(ImportError::Empty);
        }

        let value: Value =
            serde_json::from_str(text).map_err(|e| ImportError::InvalidJson(e.to_string()))?;

        match value.get("nodes") {
            Some(Value::Array(_)) => {}
            _ => return Err(ImportError::MissingNodes),
        }

        serde_json::from_value(value).map_err(|e| ImportError::InvalidShape(e.to_string()))
    }
}
