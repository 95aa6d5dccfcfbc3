//! Request and response bodies of the backend REST API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::catalog::{Component, Template};
use crate::graph::{Edge, Node, PipelineDocument};

/// Backend ids are integers, but anything scalar is accepted and kept as text.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}

/// A pipeline stored on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedModel {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl SavedModel {
    pub fn into_document(self) -> PipelineDocument {
        PipelineDocument {
            name: Some(self.name),
            description: self.description,
            nodes: self.nodes,
            edges: self.edges,
            ids: None,
        }
    }
}

/// Response to a create; only the id is used.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedModel {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateList {
    #[serde(default)]
    pub templates: Vec<Template>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentList {
    #[serde(default)]
    pub components: Vec<Component>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedCode {
    #[serde(default)]
    pub code: String,
}

/// Findings of server-side validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResponse {
    #[serde(default)]
    pub valid: Option<bool>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Body of a version create.
#[derive(Debug, Clone, Serialize)]
pub struct NewVersion {
    pub name: String,
    pub description: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub generate_code: bool,
    pub metadata: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelVersion {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub version_number: u32,
    #[serde(default)]
    pub version_tag: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl ModelVersion {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Untitled Version")
    }

    pub fn into_document(self) -> PipelineDocument {
        PipelineDocument {
            name: self.name,
            description: self.description,
            nodes: self.nodes,
            edges: self.edges,
            ids: None,
        }
    }
}

/// Files produced by a server-side export.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExportArtifacts {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub script_filename: Option<String>,
    #[serde(default)]
    pub notebook: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default, rename = "Dockerfile")]
    pub dockerfile: Option<String>,
    #[serde(default, rename = "docker-compose.yml")]
    pub docker_compose: Option<String>,
    #[serde(default, rename = ".dockerignore")]
    pub dockerignore: Option<String>,
    #[serde(default, rename = "README.md")]
    pub readme: Option<String>,
}
