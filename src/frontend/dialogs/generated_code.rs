//! Generated Python code viewer

use super::{Dialog, DialogAction, DialogState, DialogWindowConfig};
use egui::Ui;

#[derive(Debug, Default)]
pub struct GeneratedCodeState;

impl DialogState for GeneratedCodeState {}

pub struct GeneratedCodeContext<'a> {
    pub code: Option<&'a str>,
}

pub struct GeneratedCodeDialog;

impl Dialog for GeneratedCodeDialog {
    type State = GeneratedCodeState;
    type Action = ();
    type Context<'a> = GeneratedCodeContext<'a>;

    fn title(_state: &Self::State) -> &'static str {
        "Generated Code"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::resizable(640.0, 480.0)
    }

    fn render(
        _state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        let Some(code) = ctx.code else {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Generating code...");
            });
            return DialogAction::None;
        };

        egui::ScrollArea::both().max_height(400.0).show(ui, |ui| {
            let mut text = code;
            ui.add(
                egui::TextEdit::multiline(&mut text)
                    .code_editor()
                    .desired_width(f32::INFINITY),
            );
        });

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("📋 Copy").clicked() {
                ui.ctx().copy_text(code.to_string());
            }
            if ui.button("Close").clicked() {
                return DialogAction::Close;
            }
            DialogAction::None
        })
        .inner
    }
}
