//! Simulation progress and per-node results

use super::{Dialog, DialogAction, DialogState, DialogWindowConfig};
use crate::simulator::{DatasetPreview, NodeOutput, NodeResult};
use egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

#[derive(Debug, Default)]
pub struct SimulationResultsState {
    /// Node whose details are expanded
    pub selected: Option<usize>,
}

impl DialogState for SimulationResultsState {}

pub struct SimulationResultsContext<'a> {
    pub results: &'a [NodeResult],
    pub total: usize,
    pub running: bool,
    pub error: Option<&'a str>,
}

pub struct SimulationResultsDialog;

impl Dialog for SimulationResultsDialog {
    type State = SimulationResultsState;
    type Action = ();
    type Context<'a> = SimulationResultsContext<'a>;

    fn title(_state: &Self::State) -> &'static str {
        "Simulation"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::resizable(620.0, 520.0)
    }

    fn render(
        state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        let total = ctx.total.max(1);
        let done = ctx.results.len();
        ui.add(
            egui::ProgressBar::new(done as f32 / total as f32)
                .text(format!("{done} / {} nodes", ctx.total))
                .animate(ctx.running),
        );

        if let Some(error) = ctx.error {
            ui.colored_label(Color32::from_rgb(220, 80, 80), format!("Simulation failed: {error}"));
        } else if !ctx.running && done > 0 {
            ui.colored_label(Color32::GREEN, "Simulation complete");
        }
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .max_height(400.0)
            .show(ui, |ui| {
                for (i, result) in ctx.results.iter().enumerate() {
                    let open = state.selected == Some(i);
                    let header = ui.selectable_label(
                        open,
                        format!("{}  ·  {}", result.node_name, result.output.summary()),
                    );
                    if header.clicked() {
                        state.selected = if open { None } else { Some(i) };
                    }
                    if open {
                        ui.indent(("sim_result", i), |ui| render_output(ui, i, &result.output));
                    }
                }
            });

        ui.separator();
        if ui.button("Close").clicked() {
            return DialogAction::Close;
        }
        DialogAction::None
    }
}

fn render_output(ui: &mut Ui, index: usize, output: &NodeOutput) {
    match output {
        NodeOutput::Dataset(preview) => render_dataset(ui, index, preview),
        NodeOutput::Split {
            train_shape,
            test_shape,
            ..
        } => {
            ui.label(format!("Train: {} × {}", train_shape.0, train_shape.1));
            ui.label(format!("Test: {} × {}", test_shape.0, test_shape.1));
        }
        NodeOutput::Model {
            algorithm,
            parameters,
            task,
        } => {
            ui.label(format!("{algorithm} trained for {}", task.display_name()));
            for (name, value) in parameters {
                ui.weak(format!("{name} = {value}"));
            }
        }
        NodeOutput::Clustering {
            algorithm,
            n_clusters,
            silhouette_score,
            cluster_centers,
        } => {
            ui.label(format!("{algorithm}: {n_clusters} clusters"));
            ui.label(format!("Silhouette score: {silhouette_score:.2}"));
            for (i, center) in cluster_centers.iter().enumerate() {
                let coords: Vec<String> = center.iter().map(|v| format!("{v:.2}")).collect();
                ui.weak(format!("Center {i}: [{}]", coords.join(", ")));
            }
        }
        NodeOutput::ClassificationReport {
            accuracy,
            confusion_matrix,
            classes,
            report,
        } => {
            ui.label(RichText::new(format!("Accuracy: {:.2}%", accuracy * 100.0)).strong());

            ui.label("Confusion matrix");
            egui::Grid::new(("confusion", index)).striped(true).show(ui, |ui| {
                ui.label("");
                for class in classes {
                    ui.label(RichText::new(class).weak());
                }
                ui.end_row();
                for (class, row) in classes.iter().zip(confusion_matrix) {
                    ui.label(RichText::new(class).weak());
                    for cell in row {
                        ui.label(cell.to_string());
                    }
                    ui.end_row();
                }
            });

            ui.add_space(4.0);
            egui::Grid::new(("class_report", index)).striped(true).show(ui, |ui| {
                for heading in ["Class", "Precision", "Recall", "F1"] {
                    ui.label(RichText::new(heading).strong());
                }
                ui.end_row();
                for score in report {
                    ui.label(&score.class);
                    ui.label(format!("{:.2}", score.precision));
                    ui.label(format!("{:.2}", score.recall));
                    ui.label(format!("{:.2}", score.f1));
                    ui.end_row();
                }
            });
        }
        NodeOutput::RegressionReport {
            mse,
            rmse,
            r2,
            y_true,
            y_pred,
        } => {
            ui.label(format!("MSE {mse:.3} · RMSE {rmse:.3} · R² {r2:.3}"));

            let points: Vec<[f64; 2]> = y_true.iter().zip(y_pred).map(|(t, p)| [*t, *p]).collect();
            let (lo, hi) = y_true
                .iter()
                .chain(y_pred)
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));

            Plot::new(("regression_plot", index))
                .height(220.0)
                .legend(Legend::default())
                .x_axis_label("Actual")
                .y_axis_label("Predicted")
                .show(ui, |plot_ui| {
                    if lo.is_finite() && hi.is_finite() {
                        plot_ui.line(
                            Line::new("Ideal", PlotPoints::from(vec![[lo, lo], [hi, hi]]))
                                .color(Color32::from_gray(120)),
                        );
                    }
                    plot_ui.points(
                        Points::new("Predictions", PlotPoints::from(points))
                            .radius(3.0)
                            .color(Color32::LIGHT_BLUE),
                    );
                });
        }
        NodeOutput::CrossValidation { scores, mean } => {
            ui.label(format!("Mean score: {mean:.3}"));
            let bars: Vec<Bar> = scores
                .iter()
                .enumerate()
                .map(|(i, s)| Bar::new((i + 1) as f64, *s).width(0.6))
                .collect();
            Plot::new(("cv_plot", index))
                .height(180.0)
                .include_y(0.0)
                .include_y(1.0)
                .show(ui, |plot_ui| {
                    plot_ui.bar_chart(BarChart::new("Fold score", bars).color(Color32::from_rgb(90, 150, 220)));
                });
        }
        NodeOutput::Unimplemented { note } => {
            ui.weak(note);
        }
    }
}

fn render_dataset(ui: &mut Ui, index: usize, preview: &DatasetPreview) {
    ui.label(format!(
        "{} ({} rows × {} columns)",
        preview.name, preview.shape.0, preview.shape.1
    ));
    if !preview.description.is_empty() {
        ui.weak(&preview.description);
    }
    if let Some(note) = &preview.note {
        ui.colored_label(Color32::from_rgb(90, 150, 220), note);
    }

    egui::ScrollArea::horizontal()
        .id_salt(("dataset_scroll", index))
        .show(ui, |ui| {
            egui::Grid::new(("dataset", index)).striped(true).show(ui, |ui| {
                for column in &preview.columns {
                    ui.label(RichText::new(column).strong());
                }
                ui.end_row();
                for row in &preview.rows {
                    for cell in row {
                        let text = match cell {
                            serde_json::Value::String(s) => s.clone(),
                            serde_json::Value::Number(n) => n.to_string(),
                            other => other.to_string(),
                        };
                        ui.label(text);
                    }
                    ui.end_row();
                }
            });
        });
}
