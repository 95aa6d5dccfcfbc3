//! Canned datasets and metric values served by the mock simulator.

use serde_json::{json, Value};

use crate::catalog::TaskFamily;

use super::result::{ClassScore, DatasetPreview, NodeOutput};

pub const DEFAULT_DATASET: &str = "iris";
pub const TEXT_DATASET: &str = "text_data";

/// Preview of a named sample dataset; unknown keys fall back to iris.
pub fn dataset(key: &str, task: TaskFamily) -> DatasetPreview {
    let (key, name, columns, rows, shape, description): (&str, &str, Vec<&str>, Vec<Vec<Value>>, (usize, usize), &str) =
        match key {
            "wine" => (
                "wine",
                "Wine Quality",
                vec!["alcohol", "malic_acid", "ash", "alcalinity", "magnesium", "target"],
                vec![
                    row(json!([14.23, 1.71, 2.43, 15.6, 127, "class_0"])),
                    row(json!([13.20, 1.78, 2.14, 11.2, 100, "class_0"])),
                    row(json!([13.16, 2.36, 2.67, 18.6, 101, "class_1"])),
                    row(json!([14.37, 1.95, 2.50, 16.8, 113, "class_1"])),
                    row(json!([13.24, 2.59, 2.87, 21.0, 118, "class_2"])),
                    row(json!([14.20, 1.76, 2.45, 15.2, 112, "class_2"])),
                ],
                (178, 13),
                "Chemical analysis of wines grown in Italy.",
            ),
            "titanic" => (
                "titanic",
                "Titanic",
                vec!["pclass", "sex", "age", "sibsp", "parch", "fare", "survived"],
                vec![
                    row(json!([3, "male", 22.0, 1, 0, 7.25, 0])),
                    row(json!([1, "female", 38.0, 1, 0, 71.28, 1])),
                    row(json!([3, "female", 26.0, 0, 0, 7.92, 1])),
                    row(json!([1, "female", 35.0, 1, 0, 53.10, 1])),
                    row(json!([3, "male", 35.0, 0, 0, 8.05, 0])),
                ],
                (891, 7),
                "Passenger survival data from the Titanic.",
            ),
            "housing" => (
                "housing",
                "Housing Data (Regression)",
                vec!["size_sqft", "bedrooms", "age", "location_score", "price"],
                vec![
                    row(json!([1500, 3, 10, 8.5, 450000])),
                    row(json!([2100, 4, 15, 7.0, 520000])),
                    row(json!([900, 2, 5, 9.0, 380000])),
                    row(json!([3000, 5, 20, 6.5, 750000])),
                    row(json!([1800, 3, 12, 8.0, 490000])),
                ],
                (500, 5),
                "House prices based on size and features.",
            ),
            "breast_cancer" => (
                "breast_cancer",
                "Breast Cancer Diagnostic",
                vec!["mean radius", "mean texture", "mean perimeter", "mean area", "target"],
                vec![
                    row(json!([17.99, 10.38, 122.8, 1001.0, "malignant"])),
                    row(json!([20.57, 17.77, 132.9, 1326.0, "malignant"])),
                    row(json!([19.69, 21.25, 130.0, 1203.0, "malignant"])),
                    row(json!([11.42, 20.38, 77.58, 386.1, "benign"])),
                    row(json!([12.45, 15.70, 82.57, 477.1, "benign"])),
                ],
                (569, 30),
                "Features computed from a digitized image of a breast mass.",
            ),
            "digits" => (
                "digits",
                "Handwritten Digits",
                vec!["pixel_0_0", "pixel_0_1", "pixel_0_2", "...", "target"],
                vec![
                    row(json!([0, 0, 5, 13, 9, 1, 0, 0])),
                    row(json!([0, 0, 0, 12, 13, 5, 0, 0])),
                    row(json!([0, 0, 0, 4, 15, 30, 0, 0])),
                ],
                (1797, 64),
                "Optical recognition of handwritten digits.",
            ),
            TEXT_DATASET => (
                TEXT_DATASET,
                "20 Newsgroups (Subset)",
                vec!["text", "category"],
                vec![
                    row(json!(["Computer graphics is amazing", "comp.graphics"])),
                    row(json!(["The shuttle launch was successful", "sci.space"])),
                    row(json!(["I need a new hard drive", "comp.sys.ibm.pc.hardware"])),
                    row(json!(["The moon orbits the earth", "sci.space"])),
                ],
                (200, 1),
                "Collection of newsgroup documents.",
            ),
            _ => (
                DEFAULT_DATASET,
                "Iris Dataset",
                vec!["sepal_length", "sepal_width", "petal_length", "petal_width", "target"],
                vec![
                    row(json!([5.1, 3.5, 1.4, 0.2, "setosa"])),
                    row(json!([4.9, 3.0, 1.4, 0.2, "setosa"])),
                    row(json!([4.7, 3.2, 1.3, 0.2, "setosa"])),
                    row(json!([7.0, 3.2, 4.7, 1.4, "versicolor"])),
                    row(json!([6.4, 3.2, 4.5, 1.5, "versicolor"])),
                    row(json!([6.9, 3.1, 4.9, 1.5, "versicolor"])),
                    row(json!([6.3, 3.3, 6.0, 2.5, "virginica"])),
                    row(json!([5.8, 2.7, 5.1, 1.9, "virginica"])),
                    row(json!([7.1, 3.0, 5.9, 2.1, "virginica"])),
                ],
                (150, 5),
                "Classic dataset for classification. 3 classes of Iris plants.",
            ),
        };

    DatasetPreview {
        key: key.to_string(),
        name: name.to_string(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows,
        shape,
        description: description.to_string(),
        note: None,
        task,
    }
}

fn row(value: Value) -> Vec<Value> {
    match value {
        Value::Array(cells) => cells,
        other => vec![other],
    }
}

/// Effect note shown after a preprocessing step.
pub fn transformation_effect(component_id: &str) -> &'static str {
    match component_id {
        "standard-scaler" => "Values are now typically between -3 and 3.",
        "min-max-scaler" => "All values are now positive and <= 1.",
        "pca" => "Features transformed into Principal Components.",
        "one-hot-encoder" => "Increased number of features.",
        "label-encoder" => "Converted strings to numbers [0, 1, 2...]",
        "tfidf-vectorizer" => "Converted text to sparse numerical matrix.",
        _ => "Processed",
    }
}

pub fn classification_report() -> NodeOutput {
    NodeOutput::ClassificationReport {
        accuracy: 0.9667,
        confusion_matrix: vec![vec![19, 0, 0], vec![0, 15, 1], vec![0, 0, 15]],
        classes: strings(&["setosa", "versicolor", "virginica"]),
        report: vec![
            ClassScore::new("setosa", 1.00, 1.00, 1.00),
            ClassScore::new("versicolor", 1.00, 0.94, 0.97),
            ClassScore::new("virginica", 0.94, 1.00, 0.97),
        ],
    }
}

pub fn text_classification_report() -> NodeOutput {
    NodeOutput::ClassificationReport {
        accuracy: 0.85,
        confusion_matrix: vec![vec![45, 5, 0], vec![8, 38, 4], vec![1, 2, 47]],
        classes: strings(&["comp.graphics", "sci.space", "comp.sys.hardware"]),
        report: vec![
            ClassScore::new("comp.graphics", 0.83, 0.90, 0.86),
            ClassScore::new("sci.space", 0.84, 0.76, 0.80),
            ClassScore::new("comp.sys.hardware", 0.92, 0.94, 0.93),
        ],
    }
}

pub fn regression_report() -> NodeOutput {
    NodeOutput::RegressionReport {
        mse: 12.45,
        rmse: 3.52,
        r2: 0.89,
        y_true: vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0],
        y_pred: vec![11.0, 19.0, 32.0, 38.0, 51.0, 62.0, 68.0, 81.0],
    }
}

pub fn clustering_result() -> NodeOutput {
    NodeOutput::Clustering {
        algorithm: "K-Means".to_string(),
        n_clusters: 3,
        silhouette_score: 0.72,
        cluster_centers: vec![
            vec![5.0, 3.4, 1.5, 0.2],
            vec![6.2, 2.9, 4.3, 1.3],
            vec![6.9, 3.1, 5.5, 2.1],
        ],
    }
}

/// Fold scores in [0.80, 0.95); the same fold count always gives the same scores.
pub fn cross_validation_scores(folds: usize) -> Vec<f64> {
    (0..folds)
        .map(|i| 0.80 + 0.15 * ((i * 37 + 11) % 97) as f64 / 97.0)
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
