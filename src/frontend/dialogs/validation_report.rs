//! Validation report dialog

use super::{Dialog, DialogAction, DialogState, DialogWindowConfig};
use crate::validation::ValidationReport;
use egui::{Color32, RichText, Ui};

#[derive(Debug, Default)]
pub struct ValidationReportState;

impl DialogState for ValidationReportState {}

pub struct ValidationReportContext<'a> {
    pub report: Option<&'a ValidationReport>,
    /// Server-side check still in flight
    pub pending_remote: bool,
}

pub struct ValidationReportDialog;

impl Dialog for ValidationReportDialog {
    type State = ValidationReportState;
    type Action = ();
    type Context<'a> = ValidationReportContext<'a>;

    fn title(_state: &Self::State) -> &'static str {
        "Pipeline Validation"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::resizable(440.0, 360.0)
    }

    fn render(
        _state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        let Some(report) = ctx.report else {
            ui.spinner();
            return DialogAction::None;
        };

        if report.is_clean() {
            ui.colored_label(Color32::GREEN, "✔ Pipeline is valid");
        } else if report.is_valid() {
            ui.colored_label(Color32::from_rgb(230, 170, 50), "Pipeline is valid with warnings");
        } else {
            ui.colored_label(Color32::from_rgb(220, 80, 80), "Pipeline has errors");
        }
        if ctx.pending_remote {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.weak("Waiting for server-side validation");
            });
        }

        egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
            for error in &report.errors {
                ui.colored_label(Color32::from_rgb(220, 80, 80), format!("✖ {error}"));
            }
            for warning in &report.warnings {
                ui.colored_label(Color32::from_rgb(230, 170, 50), format!("⚠ {warning}"));
            }
        });

        ui.separator();
        let stats = &report.stats;
        ui.label(RichText::new("Statistics").strong());
        egui::Grid::new("validation_stats")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Components");
                ui.label(stats.total_components.to_string());
                ui.end_row();
                ui.label("Connections");
                ui.label(stats.connections.to_string());
                ui.end_row();
                ui.label("Complexity");
                ui.add(
                    egui::ProgressBar::new(
                        stats.complexity as f32 / crate::validation::MAX_COMPLEXITY as f32,
                    )
                    .text(stats.complexity.to_string()),
                );
                ui.end_row();
                for (category, count) in &stats.categories {
                    ui.weak(category);
                    ui.weak(count.to_string());
                    ui.end_row();
                }
            });

        ui.separator();
        if ui.button("Close").clicked() {
            return DialogAction::Close;
        }
        DialogAction::None
    }
}
