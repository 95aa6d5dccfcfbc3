//! Import pipeline JSON dialog
//!
//! The pasted text is handed to the session as is; a rejected import keeps
//! the dialog open so the text can be fixed.

use super::{Dialog, DialogAction, DialogState, DialogWindowConfig};
use egui::Ui;

#[derive(Debug, Default)]
pub struct ImportJsonState {
    pub text: String,
}

impl DialogState for ImportJsonState {
    fn is_valid(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum ImportJsonAction {
    Import(String),
}

pub struct ImportJsonContext;

pub struct ImportJsonDialog;

impl Dialog for ImportJsonDialog {
    type State = ImportJsonState;
    type Action = ImportJsonAction;
    type Context<'a> = ImportJsonContext;

    fn title(_state: &Self::State) -> &'static str {
        "Import Pipeline"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::resizable(520.0, 400.0)
    }

    fn render(
        state: &mut Self::State,
        _ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        ui.label("Paste a pipeline JSON document with \"nodes\" and \"edges\":");

        egui::ScrollArea::vertical()
            .max_height(280.0)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut state.text)
                        .code_editor()
                        .desired_rows(14)
                        .desired_width(f32::INFINITY),
                );
            });

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Load file...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Pipeline JSON", &["json"])
                    .pick_file()
                {
                    match std::fs::read_to_string(&path) {
                        Ok(text) => state.text = text,
                        Err(e) => tracing::warn!("Failed to read {}: {}", path.display(), e),
                    }
                }
            }
            if ui
                .add_enabled(state.is_valid(), egui::Button::new("Import"))
                .clicked()
            {
                return DialogAction::Action(ImportJsonAction::Import(state.text.clone()));
            }
            if ui.button("Cancel").clicked() {
                return DialogAction::Close;
            }
            DialogAction::None
        })
        .inner
    }
}
