//! Starter pipelines and their mapping onto catalog components.

use serde::{Deserialize, Serialize};

use super::{Component, ComponentLibrary};
use crate::graph::{Edge, Node, NodeData, NodeId, Parameters, PipelineDocument, Position};

/// Node as written in a template file. Looser than [`Node`]: the component is
/// referenced by display name and most fields are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateNode {
    pub id: NodeId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: TemplateNodeData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateNodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplatePipeline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<TemplateNode>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// A ready-made pipeline offered in the templates dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pipeline: TemplatePipeline,
}

impl Template {
    pub fn node_count(&self) -> usize {
        self.pipeline.nodes.len()
    }

    /// Resolve template nodes against `library` and produce a loadable document.
    ///
    /// Nodes are matched to components by name; unmatched nodes get a
    /// placeholder component with no parameters.
    pub fn instantiate(&self, library: &ComponentLibrary) -> PipelineDocument {
        let nodes = self
            .pipeline
            .nodes
            .iter()
            .map(|tn| Self::resolve_node(tn, library))
            .collect();

        PipelineDocument {
            name: Some(
                self.pipeline
                    .name
                    .clone()
                    .unwrap_or_else(|| self.name.clone()),
            ),
            description: Some(self.description.clone()).filter(|d| !d.is_empty()),
            nodes,
            edges: self.pipeline.edges.clone(),
            ids: None,
        }
    }

    fn resolve_node(tn: &TemplateNode, library: &ComponentLibrary) -> Node {
        let node_type = tn.node_type.clone().or_else(|| tn.data.node_type.clone());
        let name = tn.name.clone().or_else(|| tn.data.label.clone());

        let component = name
            .as_deref()
            .and_then(|n| library.find_by_name(n))
            .cloned()
            .unwrap_or_else(|| {
                Component::placeholder(
                    tn.id.as_str(),
                    name.clone()
                        .unwrap_or_else(|| "Unknown Component".to_string()),
                )
                .with_icon(tn.data.icon.clone().unwrap_or_else(|| "📦".to_string()))
            });

        let icon = tn
            .data
            .icon
            .clone()
            .filter(|i| !i.is_empty())
            .or_else(|| Some(component.icon.clone()).filter(|i| !i.is_empty()))
            .unwrap_or_else(|| "📦".to_string());

        Node {
            id: tn.id.clone(),
            node_type: node_type.unwrap_or_else(|| component.node_type.clone()),
            position: tn.position,
            data: NodeData {
                component_id: component.id.clone(),
                label: tn.data.label.clone().unwrap_or_else(|| component.name.clone()),
                icon,
                icon_name: Some(component.icon_name().to_string()),
                parameters: tn.data.parameters.clone().unwrap_or_default(),
            },
        }
    }
}
