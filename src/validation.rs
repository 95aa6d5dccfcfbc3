//! Structural and parameter checks over a pipeline graph.
//!
//! Validation never mutates the graph and never fails: every finding ends up
//! as a string in the report's `errors` or `warnings`.

use crate::api::{ApiError, ValidationResponse};
use crate::catalog::{Component, ComponentKind, ComponentLibrary, ParamKind};
use crate::graph::{has_cycle, GraphModel, Node, ParamValue};

pub const EMPTY_PIPELINE: &str = "Pipeline is empty. Add some components first.";
pub const CYCLE_DETECTED: &str = "Pipeline contains cycles, which are not allowed.";
pub const REMOTE_UNAVAILABLE: &str = "Could not perform server-side validation";

/// Upper bound of the complexity score.
pub const MAX_COMPLEXITY: usize = 20;

/// Descriptive numbers shown next to the findings. No pass/fail meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub total_components: usize,
    pub connections: usize,
    /// Node counts per node type, in first-seen order.
    pub component_types: Vec<(String, usize)>,
    /// Node counts per catalog category, in first-seen order.
    pub categories: Vec<(String, usize)>,
    pub complexity: usize,
}

impl PipelineStats {
    fn collect(graph: &GraphModel, library: &ComponentLibrary) -> Self {
        let mut component_types = Vec::new();
        let mut categories = Vec::new();
        for node in graph.nodes() {
            let node_type = if node.node_type.is_empty() {
                "unknown"
            } else {
                node.node_type.as_str()
            };
            bump(&mut component_types, node_type);

            if let Some(component) = library.get(node.component_id()) {
                let category = if component.category.is_empty() {
                    "Other"
                } else {
                    component.category.as_str()
                };
                bump(&mut categories, category);
            }
        }

        let nodes = graph.nodes().len();
        let edges = graph.edges().len();
        Self {
            total_components: nodes,
            connections: edges,
            component_types,
            categories,
            complexity: (nodes + edges).min(MAX_COMPLEXITY),
        }
    }
}

fn bump(counts: &mut Vec<(String, usize)>, key: &str) {
    match counts.iter_mut().find(|(k, _)| k == key) {
        Some((_, n)) => *n += 1,
        None => counts.push((key.to_string(), 1)),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: PipelineStats,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Append the backend's findings, or a warning if it could not be reached.
    pub fn merge_remote(&mut self, remote: Result<ValidationResponse, ApiError>) {
        match remote {
            Ok(response) => {
                self.errors.extend(response.errors);
                self.warnings.extend(response.warnings);
            }
            Err(e) => {
                tracing::warn!("Server-side validation failed: {}", e);
                self.warnings.push(REMOTE_UNAVAILABLE.to_string());
            }
        }
    }
}

pub struct ValidationEngine<'a> {
    library: &'a ComponentLibrary,
}

impl<'a> ValidationEngine<'a> {
    pub fn new(library: &'a ComponentLibrary) -> Self {
        Self { library }
    }

    pub fn validate(&self, graph: &GraphModel) -> ValidationReport {
        let mut report = ValidationReport {
            stats: PipelineStats::collect(graph, self.library),
            ..ValidationReport::default()
        };

        if graph.is_empty() {
            report.errors.push(EMPTY_PIPELINE.to_string());
            return report;
        }

        if has_cycle(graph.nodes(), graph.edges()) {
            report.errors.push(CYCLE_DETECTED.to_string());
        }

        let many = graph.nodes().len() > 1;
        for node in graph.nodes() {
            let has_input = graph.incoming(&node.id).next().is_some();
            let has_output = graph.outgoing(&node.id).next().is_some();

            if many && !has_input && !has_output {
                report
                    .warnings
                    .push(format!("Node \"{}\" is not connected.", node.label()));
            }

            if !has_input && !self.library.kind_of(node.component_id()).is_loader() {
                report
                    .errors
                    .push(format!("Node \"{}\" is missing inputs.", node.label()));
            }

            if let Some(component) = self.library.get(node.component_id()) {
                report.errors.extend(check_parameters(node, component));
            }
        }

        self.check_task_families(graph, &mut report);

        tracing::debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "Validated pipeline"
        );
        report
    }

    /// One error per edge feeding a model into an evaluator of the other family.
    fn check_task_families(&self, graph: &GraphModel, report: &mut ValidationReport) {
        for edge in graph.edges() {
            let (Some(source), Some(target)) = (graph.node(&edge.source), graph.node(&edge.target))
            else {
                continue;
            };
            let Some(family) = self.library.kind_of(source.component_id()).task_family() else {
                continue;
            };
            let ComponentKind::Evaluator(evaluator) = self.library.kind_of(target.component_id())
            else {
                continue;
            };
            if evaluator.rejects(family) {
                report.errors.push(format!(
                    "Node \"{}\" cannot evaluate \"{}\": {} models are not supported.",
                    target.label(),
                    source.label(),
                    family.display_name()
                ));
            }
        }
    }
}

/// Required, range and type checks for a node's parameters.
pub fn check_parameters(node: &Node, component: &Component) -> Vec<String> {
    let mut errors = Vec::new();
    for spec in &component.parameters {
        let label = spec.display_label();
        let value = node.data.parameters.get(&spec.name);

        let missing = value.map_or(true, ParamValue::is_empty_text);
        if missing {
            if spec.required {
                errors.push(format!(
                    "Node \"{}\": Missing required parameter: {}",
                    node.label(),
                    label
                ));
            }
            continue;
        }

        if !matches!(spec.kind, ParamKind::Number | ParamKind::Float | ParamKind::Integer) {
            continue;
        }
        let Some(number) = value.and_then(ParamValue::as_f64) else {
            errors.push(format!("Node \"{}\": {} must be a number", node.label(), label));
            continue;
        };
        if let Some(min) = spec.min.filter(|min| number < *min) {
            errors.push(format!("Node \"{}\": {} must be >= {}", node.label(), label, min));
        }
        if let Some(max) = spec.max.filter(|max| number > *max) {
            errors.push(format!("Node \"{}\": {} must be <= {}", node.label(), label, max));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;

    fn library() -> ComponentLibrary {
        ComponentLibrary::builtin()
    }

    fn add(graph: &mut GraphModel, library: &ComponentLibrary, id: &str) -> NodeId {
        graph.add_node(library.get(id).unwrap(), 0.0, 0.0).id
    }

    #[test]
    fn test_empty_pipeline() {
        let library = library();
        let report = ValidationEngine::new(&library).validate(&GraphModel::new());
        assert_eq!(report.errors, vec![EMPTY_PIPELINE.to_string()]);
        assert_eq!(report.stats.complexity, 0);
    }

    #[test]
    fn test_single_loader_is_clean() {
        let library = library();
        let mut graph = GraphModel::new();
        add(&mut graph, &library, "csv-loader");
        let report = ValidationEngine::new(&library).validate(&graph);
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn test_isolated_nodes_warn_when_more_than_one() {
        let library = library();
        let mut graph = GraphModel::new();
        add(&mut graph, &library, "csv-loader");
        add(&mut graph, &library, "sample-data");
        let report = ValidationEngine::new(&library).validate(&graph);
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].ends_with("is not connected."));
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_missing_inputs() {
        let library = library();
        let mut graph = GraphModel::new();
        add(&mut graph, &library, "standard-scaler");
        let report = ValidationEngine::new(&library).validate(&graph);
        assert_eq!(
            report.errors,
            vec!["Node \"Standard Scaler\" is missing inputs.".to_string()]
        );
    }

    #[test]
    fn test_task_family_mismatch_one_error_per_edge() {
        let library = library();
        let mut graph = GraphModel::new();
        let data = add(&mut graph, &library, "csv-loader");
        let model = add(&mut graph, &library, "linear-regression");
        let metrics = add(&mut graph, &library, "classification-metrics");
        graph.connect(&data, &model).unwrap();
        graph.connect(&model, &metrics).unwrap();

        let report = ValidationEngine::new(&library).validate(&graph);
        let mismatches: Vec<_> = report
            .errors
            .iter()
            .filter(|e| e.contains("cannot evaluate"))
            .collect();
        assert_eq!(mismatches.len(), 1);
        assert!(mismatches[0].contains("Linear Regression"));
        assert!(mismatches[0].contains("Classification Metrics"));
    }

    #[test]
    fn test_mismatch_is_symmetric() {
        let library = library();
        let mut graph = GraphModel::new();
        let data = add(&mut graph, &library, "csv-loader");
        let model = add(&mut graph, &library, "logistic-regression");
        let metrics = add(&mut graph, &library, "regression-metrics");
        graph.connect(&data, &model).unwrap();
        graph.connect(&model, &metrics).unwrap();

        let report = ValidationEngine::new(&library).validate(&graph);
        assert_eq!(report.errors.len(), 1, "{:?}", report.errors);
    }

    #[test]
    fn test_cycle_detected() {
        let library = library();
        let mut graph = GraphModel::new();
        let a = add(&mut graph, &library, "standard-scaler");
        let b = add(&mut graph, &library, "pca");
        graph.connect(&a, &b).unwrap();
        graph.connect(&b, &a).unwrap();

        let report = ValidationEngine::new(&library).validate(&graph);
        assert!(report.errors.contains(&CYCLE_DETECTED.to_string()));
    }

    #[test]
    fn test_parameter_checks() {
        let library = library();
        let mut graph = GraphModel::new();
        let data = add(&mut graph, &library, "csv-loader");
        let split = add(&mut graph, &library, "train-test-split");
        graph.connect(&data, &split).unwrap();

        graph
            .set_parameter(&split, "test_size", ParamValue::Float(1.5))
            .unwrap();
        let report = ValidationEngine::new(&library).validate(&graph);
        assert_eq!(
            report.errors,
            vec!["Node \"Train/Test Split\": Test Size must be <= 0.95".to_string()]
        );

        graph
            .set_parameter(&split, "test_size", ParamValue::Text("big".into()))
            .unwrap();
        let report = ValidationEngine::new(&library).validate(&graph);
        assert!(report.errors[0].ends_with("Test Size must be a number"));
    }

    #[test]
    fn test_required_parameter() {
        let library = library();
        let mut graph = GraphModel::new();
        let data = add(&mut graph, &library, "csv-loader");
        let kmeans = add(&mut graph, &library, "kmeans-clustering");
        graph.connect(&data, &kmeans).unwrap();
        graph
            .set_parameter(&kmeans, "n_clusters", ParamValue::Text(String::new()))
            .unwrap();

        let report = ValidationEngine::new(&library).validate(&graph);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("Missing required parameter"));
    }

    #[test]
    fn test_stats_and_remote_merge() {
        let library = library();
        let mut graph = GraphModel::new();
        let data = add(&mut graph, &library, "csv-loader");
        let scaler = add(&mut graph, &library, "standard-scaler");
        graph.connect(&data, &scaler).unwrap();

        let mut report = ValidationEngine::new(&library).validate(&graph);
        assert_eq!(report.stats.total_components, 2);
        assert_eq!(report.stats.connections, 1);
        assert_eq!(report.stats.complexity, 3);
        assert_eq!(
            report.stats.component_types,
            vec![("data".to_string(), 1), ("preprocessing".to_string(), 1)]
        );

        report.merge_remote(Ok(ValidationResponse {
            valid: Some(false),
            errors: vec!["server says no".into()],
            warnings: vec![],
        }));
        assert_eq!(report.errors, vec!["server says no".to_string()]);

        report.merge_remote(Err(ApiError::Network("refused".into())));
        assert_eq!(report.warnings, vec![REMOTE_UNAVAILABLE.to_string()]);
    }
}
