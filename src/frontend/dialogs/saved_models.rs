//! Saved models browser

use super::{Dialog, DialogAction, DialogState, DialogWindowConfig};
use crate::api::SavedModel;
use egui::{RichText, Ui};

#[derive(Debug, Default)]
pub struct SavedModelsState {
    /// Model awaiting delete confirmation
    pub confirm_delete: Option<String>,
}

impl DialogState for SavedModelsState {}

#[derive(Debug, Clone)]
pub enum SavedModelsAction {
    Load(String),
    Delete(String),
    Refresh,
}

pub struct SavedModelsContext<'a> {
    pub models: &'a [SavedModel],
    pub loading: bool,
    pub error: Option<&'a str>,
}

pub struct SavedModelsDialog;

impl Dialog for SavedModelsDialog {
    type State = SavedModelsState;
    type Action = SavedModelsAction;
    type Context<'a> = SavedModelsContext<'a>;

    fn title(_state: &Self::State) -> &'static str {
        "Saved Models"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::resizable(480.0, 360.0)
    }

    fn render(
        state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        let mut action = DialogAction::None;

        ui.horizontal(|ui| {
            if ui.button("⟳ Refresh").clicked() {
                action = DialogAction::Action(SavedModelsAction::Refresh);
            }
            if ctx.loading {
                ui.spinner();
            }
        });

        if let Some(error) = ctx.error {
            ui.colored_label(egui::Color32::from_rgb(220, 80, 80), error);
        }
        ui.separator();

        if ctx.models.is_empty() && !ctx.loading {
            ui.weak("No saved models yet");
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for model in ctx.models {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&model.name).strong());
                        let mut details = format!("{} nodes", model.nodes.len());
                        if let Some(updated) = &model.updated_at {
                            details.push_str(&format!(" · updated {updated}"));
                        }
                        ui.weak(details);
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if state.confirm_delete.as_deref() == Some(model.id.as_str()) {
                            if ui.button("Cancel").clicked() {
                                state.confirm_delete = None;
                            }
                            if ui.button("Confirm delete").clicked() {
                                state.confirm_delete = None;
                                action = DialogAction::Action(SavedModelsAction::Delete(
                                    model.id.clone(),
                                ));
                            }
                        } else {
                            if ui.button("🗑").on_hover_text("Delete").clicked() {
                                state.confirm_delete = Some(model.id.clone());
                            }
                            if ui.button("Open").clicked() {
                                action = DialogAction::CloseWithAction(SavedModelsAction::Load(
                                    model.id.clone(),
                                ));
                            }
                        }
                    });
                });
                ui.separator();
            }
        });

        if ui.button("Close").clicked() {
            return DialogAction::Close;
        }
        action
    }
}
