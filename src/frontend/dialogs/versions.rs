//! Model version history dialog
//!
//! Lists the versions of the saved model and creates new ones from the
//! current canvas.

use super::{Dialog, DialogAction, DialogState, DialogWindowConfig};
use crate::api::ModelVersion;
use egui::{Color32, RichText, Ui};

#[derive(Debug, Default)]
pub struct VersionsState {
    pub name: String,
    pub description: String,
}

impl DialogState for VersionsState {
    fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum VersionsAction {
    Create { name: String, description: String },
    Load(String),
    Activate(String),
    Delete(String),
    Refresh,
}

pub struct VersionsContext<'a> {
    pub model_name: Option<&'a str>,
    pub is_saved: bool,
    pub versions: &'a [ModelVersion],
    pub loading: bool,
}

pub struct VersionsDialog;

impl Dialog for VersionsDialog {
    type State = VersionsState;
    type Action = VersionsAction;
    type Context<'a> = VersionsContext<'a>;

    fn title(_state: &Self::State) -> &'static str {
        "Versions"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::resizable(500.0, 420.0)
    }

    fn render(
        state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        if !ctx.is_saved {
            ui.colored_label(
                Color32::from_rgb(230, 170, 50),
                "Save the model before creating versions.",
            );
            if ui.button("Close").clicked() {
                return DialogAction::Close;
            }
            return DialogAction::None;
        }

        let mut action = DialogAction::None;

        if let Some(name) = ctx.model_name {
            ui.label(RichText::new(name).strong());
        }

        ui.group(|ui| {
            ui.label("New version");
            ui.add(egui::TextEdit::singleline(&mut state.name).hint_text("Version name"));
            ui.add(
                egui::TextEdit::multiline(&mut state.description)
                    .hint_text("What changed?")
                    .desired_rows(2),
            );
            if ui
                .add_enabled(state.is_valid(), egui::Button::new("Create version"))
                .clicked()
            {
                action = DialogAction::Action(VersionsAction::Create {
                    name: state.name.trim().to_string(),
                    description: state.description.clone(),
                });
                state.name.clear();
                state.description.clear();
            }
        });

        ui.horizontal(|ui| {
            ui.label(RichText::new("History").strong());
            if ui.small_button("⟳").on_hover_text("Refresh").clicked() {
                action = DialogAction::Action(VersionsAction::Refresh);
            }
            if ctx.loading {
                ui.spinner();
            }
        });
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            if ctx.versions.is_empty() && !ctx.loading {
                ui.weak("No versions yet");
            }
            for version in ctx.versions {
                ui.horizontal(|ui| {
                    let tag = version
                        .version_tag
                        .clone()
                        .unwrap_or_else(|| format!("v{}", version.version_number));
                    ui.label(RichText::new(tag).monospace());
                    ui.label(version.display_name());
                    if version.is_active {
                        ui.colored_label(Color32::GREEN, "active");
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🗑").on_hover_text("Delete").clicked() {
                            action = DialogAction::Action(VersionsAction::Delete(version.id.clone()));
                        }
                        if !version.is_active && ui.button("Activate").clicked() {
                            action =
                                DialogAction::Action(VersionsAction::Activate(version.id.clone()));
                        }
                        if ui.button("Load").clicked() {
                            action =
                                DialogAction::CloseWithAction(VersionsAction::Load(version.id.clone()));
                        }
                    });
                });
                if let Some(description) = version.description.as_deref().filter(|d| !d.is_empty()) {
                    ui.weak(description);
                }
                ui.separator();
            }
        });

        if ui.button("Close").clicked() {
            return DialogAction::Close;
        }
        action
    }
}
