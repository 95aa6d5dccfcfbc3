//! Export dialog
//!
//! Server formats are only offered once the model has been saved.

use super::{Dialog, DialogAction, DialogState, DialogWindowConfig};
use crate::export::{ExportFormat, SAVE_WARNING};
use egui::Ui;

#[derive(Debug, Default)]
pub struct ExportState;

impl DialogState for ExportState {}

#[derive(Debug, Clone)]
pub enum ExportAction {
    Export(ExportFormat),
}

pub struct ExportContext {
    pub is_saved: bool,
    /// An export is running on the worker
    pub busy: bool,
}

pub struct ExportDialog;

impl Dialog for ExportDialog {
    type State = ExportState;
    type Action = ExportAction;
    type Context<'a> = ExportContext;

    fn title(_state: &Self::State) -> &'static str {
        "Export Pipeline"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::centered_modal(340.0)
    }

    fn render(
        _state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        let mut action = DialogAction::None;

        if !ctx.is_saved {
            ui.colored_label(egui::Color32::from_rgb(230, 170, 50), SAVE_WARNING);
            ui.separator();
        }

        for format in ExportFormat::ALL {
            let enabled = !ctx.busy && (ctx.is_saved || !format.requires_saved_model());
            let button = egui::Button::new(format.display_name()).min_size(egui::vec2(300.0, 0.0));
            if ui.add_enabled(enabled, button).clicked() {
                action = DialogAction::CloseWithAction(ExportAction::Export(format));
            }
        }

        if ctx.busy {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.weak("Exporting...");
            });
        }

        ui.separator();
        if ui.button("Cancel").clicked() {
            return DialogAction::Close;
        }
        action
    }
}
