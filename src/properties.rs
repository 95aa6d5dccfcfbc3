//! Property editor model for the selected node.
//!
//! The form is rebuilt from the node and its catalog component whenever the
//! selection changes; the egui panel only draws it and hands raw edits back
//! through [`PropertyField::parse`].

use thiserror::Error;

use crate::catalog::{ComponentLibrary, ParamKind, ParamSpec};
use crate::graph::{Node, NodeId, ParamValue};

/// Message shown when a node references a component the catalog lacks.
pub const COMPONENT_NOT_FOUND: &str = "Component not found";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("{label} must be a number")]
    InvalidNumber { label: String },

    #[error("{label} must be a whole number")]
    InvalidInteger { label: String },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
}

/// One editable parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyField {
    pub name: String,
    pub label: String,
    pub kind: ParamKind,
    pub value: ParamValue,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub options: Vec<String>,
    pub description: String,
    pub required: bool,
}

impl PropertyField {
    fn from_spec(spec: &ParamSpec, node: &Node) -> Self {
        let value = node
            .data
            .parameters
            .get(&spec.name)
            .cloned()
            .unwrap_or_else(|| spec.initial_value());
        Self {
            name: spec.name.clone(),
            label: spec.display_label().to_string(),
            kind: spec.kind,
            value,
            min: spec.min,
            max: spec.max,
            step: spec.step,
            options: spec.options.clone(),
            description: spec.description.clone(),
            required: spec.required,
        }
    }

    /// Text shown in a text/number input.
    pub fn display_value(&self) -> String {
        self.value.to_string()
    }

    /// Checkbox state for boolean fields.
    pub fn checked(&self) -> bool {
        self.value.as_bool().unwrap_or(false)
    }

    /// Convert a raw edit into the value stored on the node.
    pub fn parse(&self, raw: &str) -> Result<ParamValue, PropertyError> {
        let raw = raw.trim();
        match self.kind {
            ParamKind::Boolean => Ok(ParamValue::Bool(matches!(
                raw.to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            ))),
            ParamKind::Integer => {
                if let Ok(n) = raw.parse::<i64>() {
                    return Ok(ParamValue::Int(n));
                }
                match raw.parse::<f64>() {
                    Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(ParamValue::Int(f as i64)),
                    Ok(_) => Err(PropertyError::InvalidInteger {
                        label: self.label.clone(),
                    }),
                    Err(_) => Err(PropertyError::InvalidNumber {
                        label: self.label.clone(),
                    }),
                }
            }
            ParamKind::Number | ParamKind::Float => match raw.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(ParamValue::Float(f)),
                _ => Err(PropertyError::InvalidNumber {
                    label: self.label.clone(),
                }),
            },
            ParamKind::Select | ParamKind::Text => Ok(ParamValue::Text(raw.to_string())),
        }
    }
}

/// Everything the property panel shows for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyForm {
    pub node_id: NodeId,
    pub node_label: String,
    /// Component display name ("Type" in the node information section).
    pub component_name: String,
    /// Set when the component is unknown; no fields are offered then.
    pub message: Option<String>,
    pub fields: Vec<PropertyField>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl PropertyForm {
    pub fn build(library: &ComponentLibrary, node: &Node) -> Self {
        let Some(component) = library.get(node.component_id()) else {
            return Self {
                node_id: node.id.clone(),
                node_label: node.label().to_string(),
                component_name: node.component_id().to_string(),
                message: Some(COMPONENT_NOT_FOUND.to_string()),
                fields: Vec::new(),
                inputs: Vec::new(),
                outputs: Vec::new(),
            };
        };

        Self {
            node_id: node.id.clone(),
            node_label: node.label().to_string(),
            component_name: component.name.clone(),
            message: None,
            fields: component
                .parameters
                .iter()
                .map(|spec| PropertyField::from_spec(spec, node))
                .collect(),
            inputs: component.inputs.clone(),
            outputs: component.outputs.clone(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&PropertyField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Parse a raw edit for the named field.
    pub fn parse_field(&self, name: &str, raw: &str) -> Result<ParamValue, PropertyError> {
        self.field(name)
            .ok_or_else(|| PropertyError::UnknownParameter(name.to_string()))?
            .parse(raw)
    }

    /// "Inputs" line of the connections section; `None` when empty.
    pub fn inputs_summary(&self) -> Option<String> {
        (!self.inputs.is_empty()).then(|| self.inputs.join(", "))
    }

    pub fn outputs_summary(&self) -> Option<String> {
        (!self.outputs.is_empty()).then(|| self.outputs.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphModel;

    fn form_for(component_id: &str) -> (GraphModel, PropertyForm) {
        let library = ComponentLibrary::builtin();
        let mut graph = GraphModel::new();
        let node = graph.add_node(library.get(component_id).unwrap(), 0.0, 0.0);
        let form = PropertyForm::build(&library, &node);
        (graph, form)
    }

    #[test]
    fn test_fields_use_node_values() {
        let library = ComponentLibrary::builtin();
        let mut graph = GraphModel::new();
        let node = graph.add_node(library.get("train-test-split").unwrap(), 0.0, 0.0);
        graph
            .set_parameter(&node.id, "test_size", ParamValue::Float(0.3))
            .unwrap();

        let form = PropertyForm::build(&library, graph.node(&node.id).unwrap());
        assert_eq!(form.component_name, "Train/Test Split");
        assert_eq!(form.field("test_size").unwrap().value, ParamValue::Float(0.3));
    }

    #[test]
    fn test_missing_value_falls_back_to_default() {
        let library = ComponentLibrary::builtin();
        let mut graph = GraphModel::new();
        let mut node = graph.add_node(library.get("train-test-split").unwrap(), 0.0, 0.0);
        node.data.parameters.clear();

        let form = PropertyForm::build(&library, &node);
        assert_eq!(form.field("test_size").unwrap().value, ParamValue::Float(0.2));
    }

    #[test]
    fn test_unknown_component() {
        let library = ComponentLibrary::builtin();
        let (_, form) = form_for("csv-loader");
        let mut node = GraphModel::new()
            .add_node(library.get("csv-loader").unwrap(), 0.0, 0.0);
        node.data.component_id = "gone".into();

        let missing = PropertyForm::build(&library, &node);
        assert_eq!(missing.message.as_deref(), Some(COMPONENT_NOT_FOUND));
        assert!(missing.fields.is_empty());
        assert!(form.message.is_none());
    }

    #[test]
    fn test_parse_per_kind() {
        let (_, form) = form_for("random-forest-classifier");
        assert_eq!(
            form.parse_field("n_estimators", "250").unwrap(),
            ParamValue::Int(250)
        );
        assert!(matches!(
            form.parse_field("n_estimators", "lots"),
            Err(PropertyError::InvalidNumber { .. })
        ));
        assert!(matches!(
            form.parse_field("nope", "1"),
            Err(PropertyError::UnknownParameter(_))
        ));

        let (_, split) = form_for("train-test-split");
        assert_eq!(
            split.parse_field("test_size", " 0.25 ").unwrap(),
            ParamValue::Float(0.25)
        );
    }

    #[test]
    fn test_number_error_message() {
        let (_, split) = form_for("train-test-split");
        let err = split.parse_field("test_size", "abc").unwrap_err();
        assert_eq!(err.to_string(), "Test Size must be a number");
    }
}
