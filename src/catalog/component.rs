//! Component metadata: what a node type is, which parameters it takes and
//! which role it plays in a pipeline.

use serde::{Deserialize, Serialize};

use crate::graph::{ParamValue, Parameters};

/// Problem family a model belongs to, used for evaluator compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFamily {
    Classification,
    Regression,
    Clustering,
    TextClassification,
}

impl TaskFamily {
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskFamily::Classification => "Classification",
            TaskFamily::Regression => "Regression",
            TaskFamily::Clustering => "Clustering",
            TaskFamily::TextClassification => "Text Classification",
        }
    }

    /// Classification and text classification share metrics.
    pub fn is_classification(&self) -> bool {
        matches!(
            self,
            TaskFamily::Classification | TaskFamily::TextClassification
        )
    }
}

/// Which evaluator a component is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    ClassificationMetrics,
    RegressionMetrics,
    ConfusionMatrix,
    CrossValidation,
}

impl EvaluatorKind {
    /// Task family this evaluator refuses to score, if any.
    pub fn rejects(&self, family: TaskFamily) -> bool {
        match self {
            EvaluatorKind::ClassificationMetrics => family == TaskFamily::Regression,
            EvaluatorKind::RegressionMetrics => family.is_classification(),
            EvaluatorKind::ConfusionMatrix | EvaluatorKind::CrossValidation => false,
        }
    }
}

/// Role of a component in a pipeline.
///
/// Resolved once from the component id when the catalog is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "family", rename_all = "snake_case")]
pub enum ComponentKind {
    Loader,
    Preprocessor,
    Splitter,
    Model(TaskFamily),
    Clusterer,
    Evaluator(EvaluatorKind),
    #[default]
    Other,
}

impl ComponentKind {
    /// Classify a backend component id.
    pub fn from_component_id(id: &str) -> Self {
        match id {
            "csv-loader" | "sample-data" | "text-loader" => ComponentKind::Loader,
            "standard-scaler" | "min-max-scaler" | "pca" | "one-hot-encoder" | "label-encoder"
            | "tfidf-vectorizer" => ComponentKind::Preprocessor,
            "train-test-split" => ComponentKind::Splitter,
            "random-forest-classifier"
            | "logistic-regression"
            | "svm-classifier"
            | "knn-classifier"
            | "gradient-boosting-classifier"
            | "mlp-classifier"
            | "decision-tree-classifier"
            | "naive-bayes" => ComponentKind::Model(TaskFamily::Classification),
            "linear-regression" | "random-forest-regressor" => {
                ComponentKind::Model(TaskFamily::Regression)
            }
            "kmeans-clustering" => ComponentKind::Clusterer,
            "classification-metrics" => {
                ComponentKind::Evaluator(EvaluatorKind::ClassificationMetrics)
            }
            "regression-metrics" => ComponentKind::Evaluator(EvaluatorKind::RegressionMetrics),
            "confusion-matrix" => ComponentKind::Evaluator(EvaluatorKind::ConfusionMatrix),
            "cross-validation" => ComponentKind::Evaluator(EvaluatorKind::CrossValidation),
            _ => ComponentKind::Other,
        }
    }

    pub fn is_loader(&self) -> bool {
        matches!(self, ComponentKind::Loader)
    }

    /// Task family of a trained model, including the clusterer.
    pub fn task_family(&self) -> Option<TaskFamily> {
        match self {
            ComponentKind::Model(family) => Some(*family),
            ComponentKind::Clusterer => Some(TaskFamily::Clustering),
            _ => None,
        }
    }

    pub fn evaluator(&self) -> Option<EvaluatorKind> {
        match self {
            ComponentKind::Evaluator(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Lucide icon name used by the palette and node headers.
    pub fn icon_name(&self) -> &'static str {
        match self {
            ComponentKind::Loader => "database",
            ComponentKind::Preprocessor => "sliders-horizontal",
            ComponentKind::Splitter => "split",
            ComponentKind::Model(TaskFamily::Regression) => "trending-up",
            ComponentKind::Model(_) => "brain",
            ComponentKind::Clusterer => "circle-dot",
            ComponentKind::Evaluator(_) => "bar-chart-3",
            ComponentKind::Other => "box",
        }
    }
}

/// Input widget kind of a parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Number,
    Float,
    Integer,
    Select,
    Boolean,
    #[default]
    #[serde(other)]
    Text,
}

impl ParamKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ParamKind::Number | ParamKind::Float | ParamKind::Integer)
    }
}

/// Declared parameter of a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamSpec {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: ParamKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn with_default(mut self, value: impl Into<ParamValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value a freshly placed node starts with:
    /// `defaultValue`, then `default`, then the empty string.
    pub fn initial_value(&self) -> ParamValue {
        self.default_value
            .clone()
            .or_else(|| self.default.clone())
            .unwrap_or_default()
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

/// A catalog entry describing an available node type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ParamSpec>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
    #[serde(skip)]
    kind: ComponentKind,
}

impl Component {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        node_type: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let kind = ComponentKind::from_component_id(&id);
        Self {
            id,
            name: name.into(),
            node_type: node_type.into(),
            category: category.into(),
            kind,
            ..Default::default()
        }
    }

    /// Stand-in used when a template references a component the catalog lacks.
    pub fn placeholder(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, "data", "Other").with_icon("📦")
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_io(mut self, inputs: &[&str], outputs: &[&str]) -> Self {
        self.inputs = inputs.iter().map(|s| s.to_string()).collect();
        self.outputs = outputs.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Re-derive the role after deserialization.
    pub(crate) fn resolve_kind(&mut self) {
        self.kind = ComponentKind::from_component_id(&self.id);
    }

    pub fn icon_name(&self) -> &'static str {
        self.kind.icon_name()
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Parameter map a freshly placed node starts with.
    pub fn default_parameters(&self) -> Parameters {
        self.parameters
            .iter()
            .map(|p| (p.name.clone(), p.initial_value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_id() {
        assert_eq!(
            ComponentKind::from_component_id("naive-bayes"),
            ComponentKind::Model(TaskFamily::Classification)
        );
        assert_eq!(
            ComponentKind::from_component_id("random-forest-regressor"),
            ComponentKind::Model(TaskFamily::Regression)
        );
        assert_eq!(
            ComponentKind::from_component_id("my-custom-step"),
            ComponentKind::Other
        );
    }

    #[test]
    fn test_evaluator_rejection_symmetric() {
        use EvaluatorKind::*;
        assert!(ClassificationMetrics.rejects(TaskFamily::Regression));
        assert!(!ClassificationMetrics.rejects(TaskFamily::Classification));
        assert!(RegressionMetrics.rejects(TaskFamily::Classification));
        assert!(RegressionMetrics.rejects(TaskFamily::TextClassification));
        assert!(!RegressionMetrics.rejects(TaskFamily::Regression));
        assert!(!ConfusionMatrix.rejects(TaskFamily::Regression));
    }

    #[test]
    fn test_initial_value_fallback_chain() {
        let mut p = ParamSpec::new("k", "K", ParamKind::Number);
        assert_eq!(p.initial_value(), ParamValue::Text(String::new()));

        p.default = Some(ParamValue::Int(3));
        assert_eq!(p.initial_value(), ParamValue::Int(3));

        p.default_value = Some(ParamValue::Int(5));
        assert_eq!(p.initial_value(), ParamValue::Int(5));
    }

    #[test]
    fn test_component_json_resolves_kind_lazily() {
        let json = r#"{
            "id": "pca", "name": "PCA", "type": "preprocessing", "category": "Preprocessing",
            "icon": "📉", "description": "Reduce dimensions",
            "parameters": [{"name": "n_components", "label": "Components", "type": "number", "default": 2, "min": 1}]
        }"#;
        let mut c: Component = serde_json::from_str(json).unwrap();
        assert_eq!(c.kind(), ComponentKind::Other);
        c.resolve_kind();
        assert_eq!(c.kind(), ComponentKind::Preprocessor);
        assert_eq!(c.default_parameters()["n_components"], ParamValue::Int(2));
    }

    #[test]
    fn test_unknown_param_type_is_text() {
        let p: ParamSpec =
            serde_json::from_str(r#"{"name": "path", "type": "file"}"#).unwrap();
        assert_eq!(p.kind, ParamKind::Text);
        assert_eq!(p.display_label(), "path");
    }
}
