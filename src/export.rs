//! Pipeline export: server-generated artifacts and the local JSON download.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::api::ExportArtifacts;
use crate::graph::{Edge, Node};

pub const SAVE_WARNING: &str = "You must save the model to use export features.";

/// Version tag written into local JSON exports.
pub const JSON_EXPORT_VERSION: &str = "1.0";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("You must save the model to use export features.")]
    SaveRequired,

    #[error("Pipeline is empty")]
    EmptyPipeline,

    #[error("Server response is missing {0}")]
    MissingArtifact(&'static str),

    #[error("{0}")]
    Serialize(String),
}

/// Download formats offered by the export dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Python,
    Notebook,
    Docker,
    Requirements,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Python,
        ExportFormat::Notebook,
        ExportFormat::Docker,
        ExportFormat::Requirements,
        ExportFormat::Json,
    ];

    /// Path segment of the server export route; `None` for formats built locally.
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            ExportFormat::Python => Some("python"),
            ExportFormat::Notebook => Some("notebook"),
            ExportFormat::Docker => Some("docker"),
            ExportFormat::Requirements => Some("requirements"),
            ExportFormat::Json => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Python => "Python Script",
            ExportFormat::Notebook => "Jupyter Notebook",
            ExportFormat::Docker => "Docker",
            ExportFormat::Requirements => "Requirements",
            ExportFormat::Json => "JSON",
        }
    }

    pub fn requires_saved_model(&self) -> bool {
        self.endpoint().is_some()
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            ExportFormat::Python => "Python script exported successfully!",
            ExportFormat::Notebook => "Jupyter notebook exported successfully!",
            ExportFormat::Docker => "Docker files exported successfully!",
            ExportFormat::Requirements => "Requirements.txt exported successfully!",
            ExportFormat::Json => "Model exported successfully",
        }
    }

    /// File name used when the server does not supply one.
    pub fn default_filename(&self, model_name: Option<&str>) -> String {
        let slug = slugify(model_name.unwrap_or_default());
        match self {
            ExportFormat::Python => format!("{slug}.py"),
            ExportFormat::Notebook => format!("{slug}.ipynb"),
            ExportFormat::Docker => "Dockerfile".to_string(),
            ExportFormat::Requirements => "requirements.txt".to_string(),
            ExportFormat::Json => format!("{slug}.json"),
        }
    }

    /// Server formats need the id of a saved model.
    pub fn check_ready<'a>(&self, model_id: Option<&'a str>) -> Result<Option<&'a str>, ExportError> {
        match (self.requires_saved_model(), model_id) {
            (false, _) => Ok(None),
            (true, Some(id)) => Ok(Some(id)),
            (true, None) => Err(ExportError::SaveRequired),
        }
    }
}

/// Lowercase file-name stem; runs of other characters collapse to `_`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "pipeline".to_string()
    } else {
        slug.to_string()
    }
}

/// A file ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

impl ExportFile {
    fn new(filename: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            contents: contents.into(),
        }
    }
}

/// Files to save for a server export response.
pub fn artifact_files(
    format: ExportFormat,
    artifacts: &ExportArtifacts,
    model_name: Option<&str>,
) -> Result<Vec<ExportFile>, ExportError> {
    let filename = || {
        artifacts
            .filename
            .clone()
            .unwrap_or_else(|| format.default_filename(model_name))
    };

    let files = match format {
        ExportFormat::Python => vec![
            ExportFile::new(filename(), required(&artifacts.script, "script")?),
            ExportFile::new("requirements.txt", required(&artifacts.requirements, "requirements")?),
        ],
        ExportFormat::Notebook => vec![ExportFile::new(
            filename(),
            required(&artifacts.notebook, "notebook")?,
        )],
        ExportFormat::Requirements => vec![ExportFile::new(
            artifacts
                .filename
                .clone()
                .unwrap_or_else(|| "requirements.txt".to_string()),
            required(&artifacts.requirements, "requirements")?,
        )],
        ExportFormat::Docker => {
            let script_name = artifacts
                .script_filename
                .clone()
                .unwrap_or_else(|| ExportFormat::Python.default_filename(model_name));
            vec![
                ExportFile::new("Dockerfile", required(&artifacts.dockerfile, "Dockerfile")?),
                ExportFile::new(
                    "docker-compose.yml",
                    artifacts.docker_compose.clone().unwrap_or_default(),
                ),
                ExportFile::new(".dockerignore", artifacts.dockerignore.clone().unwrap_or_default()),
                ExportFile::new("README.md", artifacts.readme.clone().unwrap_or_default()),
                ExportFile::new(script_name, required(&artifacts.script, "script")?),
                ExportFile::new("requirements.txt", artifacts.requirements.clone().unwrap_or_default()),
            ]
        }
        ExportFormat::Json => return Err(ExportError::MissingArtifact("JSON")),
    };
    Ok(files)
}

fn required(field: &Option<String>, name: &'static str) -> Result<String, ExportError> {
    field.clone().ok_or(ExportError::MissingArtifact(name))
}

/// Local JSON download of the canvas.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonExport<'a> {
    pub version: &'static str,
    pub name: &'a str,
    pub nodes: &'a [Node],
    pub edges: &'a [Edge],
    pub exported_at: String,
}

pub fn json_export(
    name: Option<&str>,
    nodes: &[Node],
    edges: &[Edge],
    now: DateTime<Utc>,
) -> Result<ExportFile, ExportError> {
    if nodes.is_empty() {
        return Err(ExportError::EmptyPipeline);
    }

    let name = name.filter(|n| !n.trim().is_empty()).unwrap_or("pipeline");
    let doc = JsonExport {
        version: JSON_EXPORT_VERSION,
        name,
        nodes,
        edges,
        exported_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    let contents =
        serde_json::to_string_pretty(&doc).map_err(|e| ExportError::Serialize(e.to_string()))?;

    Ok(ExportFile::new(
        ExportFormat::Json.default_filename(Some(name)),
        contents,
    ))
}

/// Write `files` into `dir`, returning the paths written.
pub fn write_files(dir: &Path, files: &[ExportFile]) -> std::io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    files
        .iter()
        .map(|file| {
            let path = dir.join(&file.filename);
            fs::write(&path, &file.contents)?;
            tracing::info!("Exported {}", path.display());
            Ok(path)
        })
        .collect()
}
