//! Toolbar panel: pipeline lifecycle, checks, history and zoom controls.
//!
//! Sits above the canvas.

use egui::{Color32, RichText, Ui};

use crate::canvas::ModelInfo;
use crate::frontend::state::{AppAction, DialogId};
use crate::history::HistoryStatus;

/// Context needed to render the toolbar.
pub struct ToolbarContext<'a> {
    pub model: &'a ModelInfo,
    pub history: Option<&'a HistoryStatus>,
    pub zoom_label: String,
    pub simulating: bool,
    pub node_count: usize,
}

/// Render the main application toolbar.
///
/// Returns actions to be applied by the app.
pub fn render_toolbar(ui: &mut Ui, ctx: &ToolbarContext<'_>) -> Vec<AppAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;

        render_file_group(ui, &mut actions);
        ui.separator();
        render_run_group(ui, ctx, &mut actions);
        ui.separator();
        render_history_group(ui, ctx, &mut actions);
        ui.separator();
        render_zoom_group(ui, ctx, &mut actions);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            render_info_group(ui, ctx);
        });
    });

    actions
}

fn render_file_group(ui: &mut Ui, actions: &mut Vec<AppAction>) {
    if ui.button("New").on_hover_text("Start an empty pipeline").clicked() {
        actions.push(AppAction::NewPipeline);
    }
    if ui.button("Open").on_hover_text("Open a saved model").clicked() {
        actions.push(AppAction::RefreshModels);
        actions.push(AppAction::OpenDialog(DialogId::SavedModels));
    }
    if ui.button("Templates").clicked() {
        actions.push(AppAction::OpenDialog(DialogId::Templates));
    }
    if ui.button("Import").on_hover_text("Paste pipeline JSON").clicked() {
        actions.push(AppAction::OpenDialog(DialogId::ImportJson));
    }
    if ui.button("Save").clicked() {
        actions.push(AppAction::OpenDialog(DialogId::SaveModel));
    }
    if ui.button("Versions").clicked() {
        actions.push(AppAction::RefreshVersions);
        actions.push(AppAction::OpenDialog(DialogId::Versions));
    }
    if ui.button("Export").clicked() {
        actions.push(AppAction::OpenDialog(DialogId::Export));
    }
}

fn render_run_group(ui: &mut Ui, ctx: &ToolbarContext<'_>, actions: &mut Vec<AppAction>) {
    if ui.button("Validate").clicked() {
        actions.push(AppAction::Validate);
    }

    if ctx.simulating {
        ui.add_enabled(false, egui::Button::new("Simulating..."));
    } else {
        let btn = egui::Button::new(RichText::new("▶ Simulate").color(Color32::WHITE))
            .fill(Color32::from_rgb(50, 120, 50));
        if ui
            .add_enabled(ctx.node_count > 0, btn)
            .on_hover_text("Run the pipeline on sample data")
            .clicked()
        {
            actions.push(AppAction::Simulate);
        }
    }

    if ui
        .button("Code")
        .on_hover_text("Generate Python code for this pipeline")
        .clicked()
    {
        actions.push(AppAction::GenerateCode);
    }
}

fn render_history_group(ui: &mut Ui, ctx: &ToolbarContext<'_>, actions: &mut Vec<AppAction>) {
    let (can_undo, can_redo, undo_tip, redo_tip) = match ctx.history {
        Some(status) => (
            status.can_undo,
            status.can_redo,
            status.undo_tooltip.as_str(),
            status.redo_tooltip.as_str(),
        ),
        None => (false, false, "Nothing to undo", "Nothing to redo"),
    };

    if ui
        .add_enabled(can_undo, egui::Button::new("↶"))
        .on_hover_text(undo_tip)
        .on_disabled_hover_text(undo_tip)
        .clicked()
    {
        actions.push(AppAction::Shortcut(crate::canvas::Shortcut::Undo));
    }
    if ui
        .add_enabled(can_redo, egui::Button::new("↷"))
        .on_hover_text(redo_tip)
        .on_disabled_hover_text(redo_tip)
        .clicked()
    {
        actions.push(AppAction::Shortcut(crate::canvas::Shortcut::Redo));
    }
}

fn render_zoom_group(ui: &mut Ui, ctx: &ToolbarContext<'_>, actions: &mut Vec<AppAction>) {
    if ui.button("−").on_hover_text("Zoom out").clicked() {
        actions.push(AppAction::ZoomOut);
    }
    ui.label(RichText::new(&ctx.zoom_label).monospace());
    if ui.button("+").on_hover_text("Zoom in").clicked() {
        actions.push(AppAction::ZoomIn);
    }
    if ui.button("Fit").on_hover_text("Fit all nodes in view").clicked() {
        actions.push(AppAction::FitView);
    }
}

fn render_info_group(ui: &mut Ui, ctx: &ToolbarContext<'_>) {
    match (&ctx.model.id, &ctx.model.name) {
        (Some(_), Some(name)) => {
            ui.label(RichText::new(name).strong());
            ui.colored_label(Color32::GREEN, "●");
        }
        (None, Some(name)) => {
            ui.label(RichText::new(format!("{name} (unsaved)")).weak());
        }
        _ => {
            ui.label(RichText::new("Untitled pipeline").weak());
        }
    }
}
