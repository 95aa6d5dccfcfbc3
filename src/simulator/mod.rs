//! Mock pipeline execution.
//!
//! The simulator walks the graph in topological order and produces canned
//! demo output for every node. Nothing is computed for real. Progress is
//! reported per node over an optional crossbeam channel so the GUI can
//! animate the run while it is still in flight.

pub mod data;
mod result;

pub use result::{ClassScore, DatasetPreview, NodeOutput, NodeResult};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use crossbeam_channel::Sender;
use serde_json::Value;
use thiserror::Error;

use crate::catalog::{ComponentKind, ComponentLibrary, EvaluatorKind, ParamSpec, TaskFamily};
use crate::config::SimulationSettings;
use crate::graph::{lenient_order, Edge, Node, NodeId};

/// A precondition failure; aborts the rest of the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Node '{label}' is missing input connection.")]
    MissingInput { label: String },

    #[error("Invalid Connection: Cannot use Classification Metrics on a Regression Model.")]
    ClassificationMetricsOnRegression,

    #[error("Invalid Connection: Cannot use Regression Metrics on a Classification Model.")]
    RegressionMetricsOnClassification,

    #[error("Evaluation requires a trained model input.")]
    MissingModel,
}

/// Progress notifications of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    Started { total: usize },
    NodeComplete(NodeResult),
    Finished { completed: usize },
    Failed { node_id: NodeId, message: String },
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationRun {
    /// Visit order
    pub order: Vec<NodeId>,
    pub results: HashMap<NodeId, NodeResult>,
}

impl SimulationRun {
    pub fn get(&self, id: &NodeId) -> Option<&NodeResult> {
        self.results.get(id)
    }

    /// Results in visit order.
    pub fn ordered(&self) -> impl Iterator<Item = &NodeResult> {
        self.order.iter().filter_map(|id| self.results.get(id))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

pub struct Simulator {
    library: Arc<ComponentLibrary>,
    settings: SimulationSettings,
    events: Option<Sender<SimulationEvent>>,
}

impl Simulator {
    pub fn new(library: Arc<ComponentLibrary>, settings: SimulationSettings) -> Self {
        Self {
            library,
            settings,
            events: None,
        }
    }

    pub fn with_events(mut self, sender: Sender<SimulationEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Run every node once. Nodes on a cycle are visited last, in their
    /// original order.
    pub async fn run(&self, nodes: &[Node], edges: &[Edge]) -> Result<SimulationRun, SimulationError> {
        let order = lenient_order(nodes, edges);
        let by_id: HashMap<&NodeId, &Node> = nodes.iter().map(|n| (&n.id, n)).collect();

        tracing::info!("Starting simulation of {} nodes", order.len());
        self.emit(SimulationEvent::Started { total: order.len() });

        let mut run = SimulationRun::default();
        for id in &order {
            let Some(node) = by_id.get(id) else {
                continue;
            };

            let delay = self.settings.node_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let output = match self.execute(node, edges, &run.results) {
                Ok(output) => output,
                Err(e) => {
                    tracing::warn!("Simulation failed at {}: {}", id, e);
                    self.emit(SimulationEvent::Failed {
                        node_id: id.clone(),
                        message: e.to_string(),
                    });
                    return Err(e);
                }
            };

            let result = NodeResult {
                node_id: id.clone(),
                node_name: node.label().to_string(),
                component_id: component_key(node).to_string(),
                output,
                timestamp: Utc::now(),
            };
            tracing::debug!("Simulated {} -> {}", id, result.output.summary());

            self.emit(SimulationEvent::NodeComplete(result.clone()));
            run.results.insert(id.clone(), result);
            run.order.push(id.clone());
        }

        tracing::info!("Simulation complete");
        self.emit(SimulationEvent::Finished {
            completed: run.results.len(),
        });
        Ok(run)
    }

    fn emit(&self, event: SimulationEvent) {
        if let Some(tx) = &self.events {
            // receiver gone means nobody is watching
            let _ = tx.send(event);
        }
    }

    fn execute(
        &self,
        node: &Node,
        edges: &[Edge],
        results: &HashMap<NodeId, NodeResult>,
    ) -> Result<NodeOutput, SimulationError> {
        let inputs: Vec<&NodeOutput> = edges
            .iter()
            .filter(|e| e.target == node.id)
            .filter_map(|e| results.get(&e.source))
            .map(|r| &r.output)
            .collect();

        let key = component_key(node);
        let kind = self.library.kind_of(key);

        check_preconditions(node, kind, &inputs)?;

        let output = match kind {
            ComponentKind::Loader => Some(load_dataset(node)),
            ComponentKind::Preprocessor => inputs.first().and_then(|i| preprocess(key, i)),
            ComponentKind::Splitter => inputs.first().and_then(|i| split(node, i)),
            ComponentKind::Model(task) => Some(NodeOutput::Model {
                algorithm: node.label().to_string(),
                parameters: node.data.parameters.clone(),
                task,
            }),
            ComponentKind::Clusterer => Some(data::clustering_result()),
            ComponentKind::Evaluator(evaluator) => {
                let folds = self.library.get(key).and_then(|c| c.param("cv"));
                Some(evaluate(node, evaluator, folds, &inputs)?)
            }
            ComponentKind::Other => None,
        };

        Ok(output.unwrap_or_else(|| {
            tracing::warn!("No simulation logic for component type: {}", key);
            NodeOutput::Unimplemented {
                note: "Logic not implemented".to_string(),
            }
        }))
    }
}

/// Component id, falling back to the node type for nodes without one.
fn component_key(node: &Node) -> &str {
    if node.component_id().is_empty() {
        &node.node_type
    } else {
        node.component_id()
    }
}

fn check_preconditions(
    node: &Node,
    kind: ComponentKind,
    inputs: &[&NodeOutput],
) -> Result<(), SimulationError> {
    if !kind.is_loader() && inputs.is_empty() {
        return Err(SimulationError::MissingInput {
            label: node.label().to_string(),
        });
    }

    let model_task = inputs.iter().find_map(|i| i.model_task());
    match (kind.evaluator(), model_task) {
        (Some(EvaluatorKind::ClassificationMetrics), Some(TaskFamily::Regression)) => {
            Err(SimulationError::ClassificationMetricsOnRegression)
        }
        (Some(EvaluatorKind::RegressionMetrics), Some(task)) if task.is_classification() => {
            Err(SimulationError::RegressionMetricsOnClassification)
        }
        _ => Ok(()),
    }
}

fn load_dataset(node: &Node) -> NodeOutput {
    let preview = match node.component_id() {
        "text-loader" => data::dataset(data::TEXT_DATASET, TaskFamily::TextClassification),
        "sample-data" => {
            let key = node
                .data
                .parameters
                .get("dataset")
                .and_then(|v| v.as_str())
                .unwrap_or(data::DEFAULT_DATASET)
                .to_lowercase();
            let task = if key.contains("housing") || key.contains("price") {
                TaskFamily::Regression
            } else {
                TaskFamily::Classification
            };
            data::dataset(&key, task)
        }
        // custom CSV files are previewed as iris
        _ => data::dataset(data::DEFAULT_DATASET, TaskFamily::Classification),
    };
    NodeOutput::Dataset(preview)
}

fn preprocess(component_id: &str, input: &NodeOutput) -> Option<NodeOutput> {
    let mut preview = input.as_dataset()?.clone();

    match component_id {
        "tfidf-vectorizer" => {
            preview.columns = (0..10).map(|i| format!("term_{i}")).collect();
            preview.rows = (0..preview.rows.len().min(5))
                .map(|r| {
                    (0..10)
                        .map(|c| Value::from(((r * 10 + c) * 7 % 100) as f64 / 100.0))
                        .collect()
                })
                .collect();
        }
        "standard-scaler" | "min-max-scaler" => {
            for row in &mut preview.rows {
                let features = row.len().saturating_sub(1);
                for cell in row.iter_mut().take(features) {
                    if let Some(v) = cell.as_f64() {
                        *cell = Value::from((v - 3.0) / 1.5);
                    }
                }
            }
        }
        _ => {}
    }

    preview.note = Some(data::transformation_effect(component_id).to_string());
    Some(NodeOutput::Dataset(preview))
}

fn split(node: &Node, input: &NodeOutput) -> Option<NodeOutput> {
    let preview = input.as_dataset()?;
    let test_size = node
        .data
        .parameters
        .get("test_size")
        .and_then(|v| v.as_f64())
        .filter(|t| (0.0..1.0).contains(t))
        .unwrap_or(0.2);

    let (rows, cols) = preview.shape;
    let train = (rows as f64 * (1.0 - test_size)).floor() as usize;

    Some(NodeOutput::Split {
        train_shape: (train, cols),
        test_shape: (rows - train, cols),
        task: preview.task,
    })
}

const DEFAULT_FOLDS: usize = 5;
const MIN_FOLDS: f64 = 2.0;
const MAX_FOLDS: f64 = 20.0;

/// Fold count from the node's `cv` parameter, clamped to the declared range
/// and never outside 2..=20.
///
/// Non-numeric values fall back to five folds.
fn fold_count(node: &Node, spec: Option<&ParamSpec>) -> usize {
    let min = spec.and_then(|s| s.min).unwrap_or(MIN_FOLDS).max(MIN_FOLDS);
    let max = spec.and_then(|s| s.max).unwrap_or(MAX_FOLDS).clamp(min, MAX_FOLDS.max(min));

    node.data
        .parameters
        .get("cv")
        .and_then(|v| v.as_f64())
        .filter(|f| f.is_finite())
        .map(|f| f.clamp(min, max) as usize)
        .unwrap_or(DEFAULT_FOLDS)
}

fn evaluate(
    node: &Node,
    evaluator: EvaluatorKind,
    folds: Option<&ParamSpec>,
    inputs: &[&NodeOutput],
) -> Result<NodeOutput, SimulationError> {
    let task = inputs
        .iter()
        .find_map(|i| i.model_task())
        .ok_or(SimulationError::MissingModel)?;

    if evaluator == EvaluatorKind::CrossValidation {
        let scores = data::cross_validation_scores(fold_count(node, folds));
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        return Ok(NodeOutput::CrossValidation { scores, mean });
    }

    Ok(match task {
        TaskFamily::TextClassification => data::text_classification_report(),
        TaskFamily::Regression => data::regression_report(),
        TaskFamily::Classification | TaskFamily::Clustering => data::classification_report(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphModel, ParamValue};

    fn simulator() -> Simulator {
        Simulator::new(
            Arc::new(ComponentLibrary::builtin()),
            SimulationSettings::instant(),
        )
    }

    fn graph_of(ids: &[&str]) -> (GraphModel, Vec<NodeId>) {
        let library = ComponentLibrary::builtin();
        let mut graph = GraphModel::new();
        let mut nodes = Vec::new();
        for (i, id) in ids.iter().enumerate() {
            let component = library.get(id).unwrap();
            nodes.push(graph.add_node(component, i as f64 * 250.0, 100.0).id);
        }
        (graph, nodes)
    }

    fn chain(graph: &mut GraphModel, ids: &[NodeId]) {
        for pair in ids.windows(2) {
            graph.connect(&pair[0], &pair[1]).unwrap();
        }
    }

    #[tokio::test]
    async fn test_classification_chain() {
        let (mut graph, ids) = graph_of(&[
            "sample-data",
            "standard-scaler",
            "random-forest-classifier",
            "classification-metrics",
        ]);
        chain(&mut graph, &ids);

        let run = simulator().run(graph.nodes(), graph.edges()).await.unwrap();
        assert_eq!(run.order, ids);
        match &run.get(&ids[3]).unwrap().output {
            NodeOutput::ClassificationReport { accuracy, .. } => assert_eq!(*accuracy, 0.9667),
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_input_aborts() {
        let (graph, _) = graph_of(&["csv-loader", "standard-scaler"]);
        let err = simulator().run(graph.nodes(), graph.edges()).await.unwrap_err();
        assert_eq!(err.to_string(), "Node 'Standard Scaler' is missing input connection.");
    }

    #[tokio::test]
    async fn test_task_mismatch() {
        let (mut graph, ids) = graph_of(&["csv-loader", "linear-regression", "classification-metrics"]);
        chain(&mut graph, &ids);
        let err = simulator().run(graph.nodes(), graph.edges()).await.unwrap_err();
        assert_eq!(err, SimulationError::ClassificationMetricsOnRegression);

        let (mut graph, ids) = graph_of(&["csv-loader", "logistic-regression", "regression-metrics"]);
        chain(&mut graph, &ids);
        let err = simulator().run(graph.nodes(), graph.edges()).await.unwrap_err();
        assert_eq!(err, SimulationError::RegressionMetricsOnClassification);
    }

    #[tokio::test]
    async fn test_evaluator_needs_model() {
        let (mut graph, ids) = graph_of(&["csv-loader", "classification-metrics"]);
        chain(&mut graph, &ids);
        let err = simulator().run(graph.nodes(), graph.edges()).await.unwrap_err();
        assert_eq!(err, SimulationError::MissingModel);
    }

    #[tokio::test]
    async fn test_split_shapes() {
        let (mut graph, ids) = graph_of(&["csv-loader", "train-test-split"]);
        chain(&mut graph, &ids);
        let run = simulator().run(graph.nodes(), graph.edges()).await.unwrap();
        assert_eq!(
            run.get(&ids[1]).unwrap().output,
            NodeOutput::Split {
                train_shape: (120, 5),
                test_shape: (30, 5),
                task: TaskFamily::Classification,
            }
        );
    }

    #[tokio::test]
    async fn test_regression_and_cross_validation() {
        let (mut graph, ids) = graph_of(&["csv-loader", "linear-regression", "regression-metrics"]);
        chain(&mut graph, &ids);
        let cv = graph.add_node(
            ComponentLibrary::builtin().get("cross-validation").unwrap(),
            0.0,
            300.0,
        );
        graph.connect(&ids[1], &cv.id).unwrap();

        let run = simulator().run(graph.nodes(), graph.edges()).await.unwrap();
        assert!(matches!(
            run.get(&ids[2]).unwrap().output,
            NodeOutput::RegressionReport { r2, .. } if r2 == 0.89
        ));
        match &run.get(&cv.id).unwrap().output {
            NodeOutput::CrossValidation { scores, .. } => assert_eq!(scores.len(), 5),
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fold_count_clamped_to_declared_range() {
        let (mut graph, ids) = graph_of(&["csv-loader", "logistic-regression", "cross-validation"]);
        chain(&mut graph, &ids);

        for (value, expected) in [
            (ParamValue::Int(2_000_000_000_000_000_000), 20),
            (ParamValue::Float(1e300), 20),
            (ParamValue::Int(0), 2),
            (ParamValue::Float(f64::NAN), 5),
            (ParamValue::from("ten"), 5),
        ] {
            graph.set_parameter(&ids[2], "cv", value).unwrap();
            let run = simulator().run(graph.nodes(), graph.edges()).await.unwrap();
            match &run.get(&ids[2]).unwrap().output {
                NodeOutput::CrossValidation { scores, .. } => assert_eq!(scores.len(), expected),
                other => panic!("unexpected output {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_events_published() {
        let (mut graph, ids) = graph_of(&["csv-loader", "kmeans-clustering"]);
        chain(&mut graph, &ids);
        let (tx, rx) = crossbeam_channel::unbounded();

        simulator()
            .with_events(tx)
            .run(graph.nodes(), graph.edges())
            .await
            .unwrap();

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.first(), Some(&SimulationEvent::Started { total: 2 }));
        assert_eq!(events.last(), Some(&SimulationEvent::Finished { completed: 2 }));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, SimulationEvent::NodeComplete(_)))
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn test_unknown_component_placeholder() {
        let mut graph = GraphModel::new();
        let placeholder = crate::catalog::Component::placeholder("custom-step", "Custom");
        let node = graph.add_node(&placeholder, 0.0, 0.0);
        let err = simulator().run(graph.nodes(), graph.edges()).await.unwrap_err();
        // non-loaders still need input
        assert!(matches!(err, SimulationError::MissingInput { .. }));

        let loader = graph.add_node(ComponentLibrary::builtin().get("csv-loader").unwrap(), 0.0, 0.0);
        graph.connect(&loader.id, &node.id).unwrap();
        let run = simulator().run(graph.nodes(), graph.edges()).await.unwrap();
        assert_eq!(
            run.get(&node.id).unwrap().output,
            NodeOutput::Unimplemented {
                note: "Logic not implemented".to_string()
            }
        );
    }
}
