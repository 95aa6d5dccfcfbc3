//! Node and edge records as stored on the canvas and exchanged with the backend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::id::{EdgeId, NodeId};

/// Canvas-space position of a node's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A scalar parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; numeric text (as produced by form inputs) also counts.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            ParamValue::Text(s) => s.trim().parse().ok(),
            ParamValue::Bool(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, ParamValue::Text(s) if s.is_empty())
    }
}

impl Default for ParamValue {
    fn default() -> Self {
        ParamValue::Text(String::new())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

/// Parameter values keyed by parameter name.
pub type Parameters = BTreeMap<String, ParamValue>;

/// Display and configuration payload of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub component_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    #[serde(default)]
    pub parameters: Parameters,
}

/// A pipeline step placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    pub fn label(&self) -> &str {
        &self.data.label
    }

    pub fn component_id(&self) -> &str {
        &self.data.component_id
    }
}

/// A directed data-flow connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_value_untagged_json() {
        let params: Parameters =
            serde_json::from_str(r#"{"a": 5, "b": 0.25, "c": "gini", "d": true}"#).unwrap();
        assert_eq!(params["a"], ParamValue::Int(5));
        assert_eq!(params["b"], ParamValue::Float(0.25));
        assert_eq!(params["c"], ParamValue::Text("gini".into()));
        assert_eq!(params["d"], ParamValue::Bool(true));
    }

    #[test]
    fn test_param_value_numeric_text() {
        assert_eq!(ParamValue::from(" 0.3 ").as_f64(), Some(0.3));
        assert_eq!(ParamValue::from("abc").as_f64(), None);
        assert_eq!(ParamValue::Bool(true).as_f64(), None);
    }

    #[test]
    fn test_node_wire_format() {
        let json = r#"{
            "id": "node-1",
            "type": "data",
            "position": {"x": 10, "y": 20.5},
            "data": {"componentId": "csv-loader", "label": "CSV Loader", "icon": "📄", "parameters": {}}
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.id.as_str(), "node-1");
        assert_eq!(node.node_type, "data");
        assert_eq!(node.position, Position::new(10.0, 20.5));
        assert_eq!(node.component_id(), "csv-loader");

        let out = serde_json::to_value(&node).unwrap();
        assert_eq!(out["data"]["componentId"], "csv-loader");
        assert!(out["data"].get("iconName").is_none());
    }

    #[test]
    fn test_node_missing_optional_fields() {
        let node: Node = serde_json::from_str(r#"{"id": "n1"}"#).unwrap();
        assert_eq!(node.label(), "");
        assert!(node.data.parameters.is_empty());
    }
}
