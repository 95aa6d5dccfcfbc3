//! Template gallery

use super::{Dialog, DialogAction, DialogState, DialogWindowConfig};
use crate::catalog::Template;
use egui::{RichText, Ui};

#[derive(Debug, Default)]
pub struct TemplatesState;

impl DialogState for TemplatesState {}

#[derive(Debug, Clone)]
pub enum TemplatesAction {
    Load(String),
    Refresh,
}

pub struct TemplatesContext<'a> {
    pub templates: &'a [Template],
}

pub struct TemplatesDialog;

impl Dialog for TemplatesDialog {
    type State = TemplatesState;
    type Action = TemplatesAction;
    type Context<'a> = TemplatesContext<'a>;

    fn title(_state: &Self::State) -> &'static str {
        "Templates"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::resizable(460.0, 380.0)
    }

    fn render(
        _state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        let mut action = DialogAction::None;

        if ctx.templates.is_empty() {
            ui.weak("No templates available");
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for template in ctx.templates {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&template.name).strong());
                        if !template.description.is_empty() {
                            ui.label(&template.description);
                        }
                        ui.weak(format!("{} components", template.node_count()));
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Use").clicked() {
                            action = DialogAction::CloseWithAction(TemplatesAction::Load(
                                template.id.clone(),
                            ));
                        }
                    });
                });
                ui.separator();
            }
        });

        ui.horizontal(|ui| {
            if ui.button("⟳ Refresh from server").clicked() {
                action = DialogAction::Action(TemplatesAction::Refresh);
            }
            if ui.button("Close").clicked() {
                action = DialogAction::Close;
            }
        });
        action
    }
}
