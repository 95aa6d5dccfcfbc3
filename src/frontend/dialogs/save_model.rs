//! Save model dialog
//!
//! Asks for the model name. Saving an already saved model updates it.

use super::{Dialog, DialogAction, DialogState, DialogWindowConfig};
use egui::Ui;

#[derive(Debug, Default)]
pub struct SaveModelState {
    pub name: String,
    /// Name was prefilled from the loaded model
    initialized: bool,
}

impl DialogState for SaveModelState {
    fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum SaveModelAction {
    Save(String),
}

pub struct SaveModelContext<'a> {
    pub current_name: Option<&'a str>,
    pub is_saved: bool,
}

pub struct SaveModelDialog;

impl Dialog for SaveModelDialog {
    type State = SaveModelState;
    type Action = SaveModelAction;
    type Context<'a> = SaveModelContext<'a>;

    fn title(_state: &Self::State) -> &'static str {
        "Save Model"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::centered_modal(360.0)
    }

    fn render(
        state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        if !state.initialized {
            state.name = ctx.current_name.unwrap_or_default().to_string();
            state.initialized = true;
        }

        ui.label("Model name");
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.name)
                .hint_text("My pipeline")
                .desired_width(f32::INFINITY),
        );
        if ctx.is_saved {
            ui.weak("Saving updates the existing model.");
        }

        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        ui.separator();
        ui.horizontal(|ui| {
            let label = if ctx.is_saved { "Update" } else { "Save" };
            // the session reports an empty name itself
            if ui.button(label).clicked() || submitted {
                return DialogAction::CloseWithAction(SaveModelAction::Save(state.name.clone()));
            }
            if ui.button("Cancel").clicked() {
                return DialogAction::Close;
            }
            DialogAction::None
        })
        .inner
    }
}
