//! Per-node simulation output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::catalog::TaskFamily;
use crate::graph::{NodeId, Parameters};

/// Table preview of a (possibly transformed) dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetPreview {
    pub key: String,
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// (rows, columns) of the full dataset, not of the preview
    pub shape: (usize, usize),
    pub description: String,
    pub note: Option<String>,
    pub task: TaskFamily,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassScore {
    pub class: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClassScore {
    pub fn new(class: &str, precision: f64, recall: f64, f1: f64) -> Self {
        Self {
            class: class.to_string(),
            precision,
            recall,
            f1,
        }
    }
}

/// What a node produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeOutput {
    Dataset(DatasetPreview),
    Split {
        train_shape: (usize, usize),
        test_shape: (usize, usize),
        task: TaskFamily,
    },
    Model {
        algorithm: String,
        parameters: Parameters,
        task: TaskFamily,
    },
    Clustering {
        algorithm: String,
        n_clusters: usize,
        silhouette_score: f64,
        cluster_centers: Vec<Vec<f64>>,
    },
    ClassificationReport {
        accuracy: f64,
        confusion_matrix: Vec<Vec<u32>>,
        classes: Vec<String>,
        report: Vec<ClassScore>,
    },
    RegressionReport {
        mse: f64,
        rmse: f64,
        r2: f64,
        y_true: Vec<f64>,
        y_pred: Vec<f64>,
    },
    CrossValidation {
        scores: Vec<f64>,
        mean: f64,
    },
    Unimplemented {
        note: String,
    },
}

impl NodeOutput {
    /// Task family of a trained model output.
    pub fn model_task(&self) -> Option<TaskFamily> {
        match self {
            NodeOutput::Model { task, .. } => Some(*task),
            NodeOutput::Clustering { .. } => Some(TaskFamily::Clustering),
            _ => None,
        }
    }

    pub fn as_dataset(&self) -> Option<&DatasetPreview> {
        match self {
            NodeOutput::Dataset(preview) => Some(preview),
            _ => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            NodeOutput::Dataset(p) => format!("{} ({} x {})", p.name, p.shape.0, p.shape.1),
            NodeOutput::Split {
                train_shape,
                test_shape,
                ..
            } => format!("train {} rows / test {} rows", train_shape.0, test_shape.0),
            NodeOutput::Model { algorithm, task, .. } => {
                format!("{} ({})", algorithm, task.display_name())
            }
            NodeOutput::Clustering {
                n_clusters,
                silhouette_score,
                ..
            } => format!("{n_clusters} clusters, silhouette {silhouette_score:.2}"),
            NodeOutput::ClassificationReport { accuracy, .. } => {
                format!("accuracy {:.2}%", accuracy * 100.0)
            }
            NodeOutput::RegressionReport { rmse, r2, .. } => format!("RMSE {rmse:.2}, R² {r2:.2}"),
            NodeOutput::CrossValidation { mean, scores } => {
                format!("{}-fold mean {:.3}", scores.len(), mean)
            }
            NodeOutput::Unimplemented { note } => note.clone(),
        }
    }
}

/// Result published for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeResult {
    pub node_id: NodeId,
    pub node_name: String,
    pub component_id: String,
    pub output: NodeOutput,
    pub timestamp: DateTime<Utc>,
}
