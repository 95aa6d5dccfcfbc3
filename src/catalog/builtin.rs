//! Offline component catalog and starter templates.
//!
//! Mirrors the component set served by the backend so the editor works
//! without a server connection.

use super::component::{Component, ParamKind, ParamSpec};
use super::template::{Template, TemplateNode, TemplateNodeData, TemplatePipeline};
use crate::graph::{Edge, EdgeId, NodeId, Parameters, Position};

const DATA: &str = "Data Input";
const PREPROCESSING: &str = "Preprocessing";
const SPLITTING: &str = "Data Splitting";
const CLASSIFICATION: &str = "Classification";
const REGRESSION: &str = "Regression";
const CLUSTERING: &str = "Clustering";
const EVALUATION: &str = "Evaluation";

fn number(name: &str, label: &str, default: f64, min: f64, max: f64) -> ParamSpec {
    ParamSpec::new(name, label, ParamKind::Number)
        .with_default(default)
        .with_range(min, max)
}

fn integer(name: &str, label: &str, default: i64, min: f64, max: f64) -> ParamSpec {
    ParamSpec::new(name, label, ParamKind::Integer)
        .with_default(default)
        .with_range(min, max)
        .with_step(1.0)
}

fn select(name: &str, label: &str, options: &[&str]) -> ParamSpec {
    let first = options.first().copied().unwrap_or_default();
    ParamSpec::new(name, label, ParamKind::Select)
        .with_options(options)
        .with_default(first)
}

fn boolean(name: &str, label: &str, default: bool) -> ParamSpec {
    ParamSpec::new(name, label, ParamKind::Boolean).with_default(default)
}

fn text(name: &str, label: &str, default: &str) -> ParamSpec {
    ParamSpec::new(name, label, ParamKind::Text).with_default(default)
}

pub(super) fn components() -> Vec<Component> {
    vec![
        // Data input
        Component::new("csv-loader", "CSV Loader", "data", DATA)
            .with_icon("📄")
            .with_description("Load a dataset from a CSV file")
            .with_param(text("file_path", "File Path", "data.csv").required())
            .with_param(text("delimiter", "Delimiter", ","))
            .with_io(&[], &["DataFrame"]),
        Component::new("sample-data", "Sample Dataset", "data", DATA)
            .with_icon("🗂️")
            .with_description("Use a built-in sample dataset")
            .with_param(select(
                "dataset",
                "Dataset",
                &["Iris", "Wine", "Titanic", "Housing", "Breast Cancer", "Digits"],
            ))
            .with_io(&[], &["DataFrame"]),
        Component::new("text-loader", "Text Loader", "data", DATA)
            .with_icon("📝")
            .with_description("Load labelled text documents")
            .with_param(text("file_path", "File Path", "texts.csv").required())
            .with_param(text("text_column", "Text Column", "text"))
            .with_io(&[], &["DataFrame"]),
        // Preprocessing
        Component::new("standard-scaler", "Standard Scaler", "preprocessing", PREPROCESSING)
            .with_icon("⚖️")
            .with_description("Standardize features to zero mean and unit variance")
            .with_param(boolean("with_mean", "Center Data", true))
            .with_param(boolean("with_std", "Scale to Unit Variance", true))
            .with_io(&["DataFrame"], &["DataFrame"]),
        Component::new("min-max-scaler", "Min-Max Scaler", "preprocessing", PREPROCESSING)
            .with_icon("📏")
            .with_description("Scale features to a fixed range")
            .with_param(number("feature_min", "Range Minimum", 0.0, -100.0, 100.0))
            .with_param(number("feature_max", "Range Maximum", 1.0, -100.0, 100.0))
            .with_io(&["DataFrame"], &["DataFrame"]),
        Component::new("pca", "PCA", "preprocessing", PREPROCESSING)
            .with_icon("📉")
            .with_description("Reduce dimensionality with principal component analysis")
            .with_param(integer("n_components", "Components", 2, 1.0, 100.0))
            .with_io(&["DataFrame"], &["DataFrame"]),
        Component::new("one-hot-encoder", "One-Hot Encoder", "preprocessing", PREPROCESSING)
            .with_icon("🔢")
            .with_description("Encode categorical columns as binary indicators")
            .with_param(select("handle_unknown", "Unknown Categories", &["ignore", "error"]))
            .with_io(&["DataFrame"], &["DataFrame"]),
        Component::new("label-encoder", "Label Encoder", "preprocessing", PREPROCESSING)
            .with_icon("🏷️")
            .with_description("Encode target labels as integers")
            .with_io(&["DataFrame"], &["DataFrame"]),
        Component::new("tfidf-vectorizer", "TF-IDF Vectorizer", "preprocessing", PREPROCESSING)
            .with_icon("🔤")
            .with_description("Convert text into TF-IDF feature vectors")
            .with_param(integer("max_features", "Max Features", 1000, 10.0, 100000.0))
            .with_param(select("ngram_range", "N-gram Range", &["(1, 1)", "(1, 2)", "(2, 2)"]))
            .with_io(&["DataFrame"], &["Matrix"]),
        // Splitting
        Component::new("train-test-split", "Train/Test Split", "preprocessing", SPLITTING)
            .with_icon("✂️")
            .with_description("Split data into training and test sets")
            .with_param(number("test_size", "Test Size", 0.2, 0.05, 0.95).with_step(0.05))
            .with_param(integer("random_state", "Random State", 42, 0.0, 10000.0))
            .with_param(boolean("shuffle", "Shuffle", true))
            .with_io(&["DataFrame"], &["Train Set", "Test Set"]),
        // Classification
        Component::new("random-forest-classifier", "Random Forest Classifier", "model", CLASSIFICATION)
            .with_icon("🌲")
            .with_description("Ensemble of decision trees for classification")
            .with_param(integer("n_estimators", "Number of Trees", 100, 1.0, 1000.0))
            .with_param(integer("max_depth", "Max Depth", 10, 1.0, 100.0))
            .with_param(select("criterion", "Criterion", &["gini", "entropy"]))
            .with_io(&["Train Set"], &["Model"]),
        Component::new("logistic-regression", "Logistic Regression", "model", CLASSIFICATION)
            .with_icon("📈")
            .with_description("Linear model for binary and multiclass classification")
            .with_param(number("C", "Regularization (C)", 1.0, 0.001, 100.0))
            .with_param(integer("max_iter", "Max Iterations", 100, 10.0, 10000.0))
            .with_io(&["Train Set"], &["Model"]),
        Component::new("svm-classifier", "SVM Classifier", "model", CLASSIFICATION)
            .with_icon("🎯")
            .with_description("Support vector machine classifier")
            .with_param(number("C", "Regularization (C)", 1.0, 0.001, 100.0))
            .with_param(select("kernel", "Kernel", &["rbf", "linear", "poly", "sigmoid"]))
            .with_io(&["Train Set"], &["Model"]),
        Component::new("knn-classifier", "K-Nearest Neighbors", "model", CLASSIFICATION)
            .with_icon("📍")
            .with_description("Classify by majority vote of nearest neighbors")
            .with_param(integer("n_neighbors", "Neighbors (K)", 5, 1.0, 50.0))
            .with_io(&["Train Set"], &["Model"]),
        Component::new(
            "gradient-boosting-classifier",
            "Gradient Boosting Classifier",
            "model",
            CLASSIFICATION,
        )
        .with_icon("🚀")
        .with_description("Boosted ensemble of shallow trees")
        .with_param(integer("n_estimators", "Number of Estimators", 100, 1.0, 1000.0))
        .with_param(number("learning_rate", "Learning Rate", 0.1, 0.001, 1.0))
        .with_io(&["Train Set"], &["Model"]),
        Component::new("mlp-classifier", "Neural Network (MLP)", "model", CLASSIFICATION)
            .with_icon("🧠")
            .with_description("Multi-layer perceptron classifier")
            .with_param(text("hidden_layer_sizes", "Hidden Layers", "100"))
            .with_param(integer("max_iter", "Max Iterations", 200, 10.0, 10000.0))
            .with_io(&["Train Set"], &["Model"]),
        Component::new("decision-tree-classifier", "Decision Tree", "model", CLASSIFICATION)
            .with_icon("🌳")
            .with_description("Single decision tree classifier")
            .with_param(integer("max_depth", "Max Depth", 5, 1.0, 100.0))
            .with_io(&["Train Set"], &["Model"]),
        Component::new("naive-bayes", "Naive Bayes", "model", CLASSIFICATION)
            .with_icon("🎲")
            .with_description("Probabilistic classifier based on Bayes' theorem")
            .with_param(number("var_smoothing", "Variance Smoothing", 1e-9, 0.0, 1.0))
            .with_io(&["Train Set"], &["Model"]),
        // Regression
        Component::new("linear-regression", "Linear Regression", "model", REGRESSION)
            .with_icon("📐")
            .with_description("Ordinary least squares regression")
            .with_param(boolean("fit_intercept", "Fit Intercept", true))
            .with_io(&["Train Set"], &["Model"]),
        Component::new("random-forest-regressor", "Random Forest Regressor", "model", REGRESSION)
            .with_icon("🌲")
            .with_description("Ensemble of decision trees for regression")
            .with_param(integer("n_estimators", "Number of Trees", 100, 1.0, 1000.0))
            .with_param(integer("max_depth", "Max Depth", 10, 1.0, 100.0))
            .with_io(&["Train Set"], &["Model"]),
        // Clustering
        Component::new("kmeans-clustering", "K-Means Clustering", "model", CLUSTERING)
            .with_icon("🔵")
            .with_description("Partition samples into K clusters")
            .with_param(integer("n_clusters", "Number of Clusters", 3, 2.0, 20.0).required())
            .with_io(&["DataFrame"], &["Clusters"]),
        // Evaluation
        Component::new("classification-metrics", "Classification Metrics", "evaluation", EVALUATION)
            .with_icon("📊")
            .with_description("Accuracy, precision, recall and F1 score")
            .with_io(&["Model"], &["Report"]),
        Component::new("regression-metrics", "Regression Metrics", "evaluation", EVALUATION)
            .with_icon("📉")
            .with_description("MSE, RMSE and R² score")
            .with_io(&["Model"], &["Report"]),
        Component::new("confusion-matrix", "Confusion Matrix", "evaluation", EVALUATION)
            .with_icon("🔲")
            .with_description("Matrix of predicted versus actual classes")
            .with_io(&["Model"], &["Report"]),
        Component::new("cross-validation", "Cross Validation", "evaluation", EVALUATION)
            .with_icon("🔁")
            .with_description("K-fold cross-validation scores")
            .with_param(integer("cv", "Folds", 5, 2.0, 20.0))
            .with_io(&["Model"], &["Report"]),
    ]
}

fn chain(steps: &[(&str, &str, &str, Parameters)]) -> TemplatePipeline {
    let nodes: Vec<TemplateNode> = steps
        .iter()
        .enumerate()
        .map(|(i, (label, node_type, icon, parameters))| TemplateNode {
            id: NodeId::from_counter(i as u64 + 1),
            node_type: Some(node_type.to_string()),
            name: Some(label.to_string()),
            position: Position::new(100.0 + 300.0 * i as f64, 200.0),
            data: TemplateNodeData {
                label: Some(label.to_string()),
                icon: Some(icon.to_string()),
                node_type: None,
                parameters: Some(parameters.clone()),
            },
        })
        .collect();

    let edges = nodes
        .windows(2)
        .enumerate()
        .map(|(i, pair)| Edge {
            id: EdgeId::from_counter(i as u64 + 1),
            source: pair[0].id.clone(),
            target: pair[1].id.clone(),
        })
        .collect();

    TemplatePipeline {
        name: None,
        nodes,
        edges,
    }
}

fn params(pairs: &[(&str, crate::graph::ParamValue)]) -> Parameters {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub(super) fn templates() -> Vec<Template> {
    use crate::graph::ParamValue as V;

    vec![
        Template {
            id: "iris-classification".into(),
            name: "Iris Classification".into(),
            description: "Classify iris flowers with a random forest".into(),
            pipeline: chain(&[
                ("CSV Loader", "data", "📄", params(&[("file_path", V::from("iris.csv"))])),
                ("Standard Scaler", "preprocessing", "⚖️", params(&[])),
                (
                    "Random Forest Classifier",
                    "model",
                    "🌲",
                    params(&[("n_estimators", V::Int(100)), ("max_depth", V::Int(10))]),
                ),
                ("Classification Metrics", "evaluation", "📊", params(&[])),
            ]),
        },
        Template {
            id: "house-price-regression".into(),
            name: "House Price Regression".into(),
            description: "Predict house prices with linear regression".into(),
            pipeline: chain(&[
                ("Sample Dataset", "data", "🗂️", params(&[("dataset", V::from("Housing"))])),
                ("Train/Test Split", "preprocessing", "✂️", params(&[("test_size", V::Float(0.2))])),
                ("Linear Regression", "model", "📐", params(&[])),
                ("Regression Metrics", "evaluation", "📉", params(&[])),
            ]),
        },
        Template {
            id: "customer-segmentation".into(),
            name: "Customer Segmentation".into(),
            description: "Group similar samples with K-Means".into(),
            pipeline: chain(&[
                ("Sample Dataset", "data", "🗂️", params(&[("dataset", V::from("Wine"))])),
                ("Standard Scaler", "preprocessing", "⚖️", params(&[])),
                ("K-Means Clustering", "model", "🔵", params(&[("n_clusters", V::Int(3))])),
            ]),
        },
        Template {
            id: "text-classification".into(),
            name: "Text Classification".into(),
            description: "Sentiment analysis with TF-IDF and Naive Bayes".into(),
            pipeline: chain(&[
                ("Text Loader", "data", "📝", params(&[])),
                ("TF-IDF Vectorizer", "preprocessing", "🔤", params(&[("max_features", V::Int(1000))])),
                ("Naive Bayes", "model", "🎲", params(&[])),
                ("Classification Metrics", "evaluation", "📊", params(&[])),
            ]),
        },
    ]
}
