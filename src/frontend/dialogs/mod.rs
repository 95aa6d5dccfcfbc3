//! Dialog windows of the pipeline editor
//!
//! Every dialog implements [`Dialog`]: it owns a state type that survives
//! between frames, receives a borrowed context, and answers with a
//! [`DialogAction`]. [`show_dialog`] drives the window lifecycle.

use egui::{Align2, Color32, Context, Ui};

/// What a dialog wants after a frame
#[derive(Debug, Clone, Default)]
pub enum DialogAction<A> {
    /// Stay open
    #[default]
    None,
    Close,
    /// Close, then apply the action
    CloseWithAction(A),
    /// Apply the action and stay open
    Action(A),
}

impl<A> DialogAction<A> {
    pub fn should_close(&self) -> bool {
        matches!(self, DialogAction::Close | DialogAction::CloseWithAction(_))
    }

    pub fn into_action(self) -> Option<A> {
        match self {
            DialogAction::CloseWithAction(a) | DialogAction::Action(a) => Some(a),
            _ => None,
        }
    }
}

/// Per-dialog state; reset whenever the dialog closes.
pub trait DialogState: Default {
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the primary button may be pressed
    fn is_valid(&self) -> bool {
        true
    }
}

/// Window appearance
#[derive(Debug, Clone)]
pub struct DialogWindowConfig {
    pub default_width: f32,
    /// `None` sizes to content
    pub default_height: Option<f32>,
    pub resizable: bool,
    pub collapsible: bool,
    pub anchor: Option<(Align2, [f32; 2])>,
    /// Dim the rest of the application
    pub modal: bool,
}

impl Default for DialogWindowConfig {
    fn default() -> Self {
        Self {
            default_width: 400.0,
            default_height: None,
            resizable: true,
            collapsible: false,
            anchor: None,
            modal: false,
        }
    }
}

impl DialogWindowConfig {
    pub fn centered_modal(width: f32) -> Self {
        Self {
            default_width: width,
            resizable: false,
            anchor: Some((Align2::CENTER_CENTER, [0.0, 0.0])),
            modal: true,
            ..Self::default()
        }
    }

    pub fn resizable(width: f32, height: f32) -> Self {
        Self {
            default_width: width,
            default_height: Some(height),
            ..Self::default()
        }
    }
}

/// A dialog window.
///
/// ```ignore
/// impl Dialog for SaveModelDialog {
///     type State = SaveModelState;
///     type Action = SaveModelAction;
///     type Context<'a> = SaveModelContext<'a>;
///
///     fn title(_state: &Self::State) -> &'static str { "Save Model" }
///
///     fn render(state: &mut Self::State, ctx: Self::Context<'_>, ui: &mut Ui)
///         -> DialogAction<Self::Action> { /* ... */ }
/// }
/// ```
pub trait Dialog {
    type State: DialogState;
    type Action;
    type Context<'a>;

    fn title(state: &Self::State) -> &'static str;

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::default()
    }

    fn render(
        state: &mut Self::State,
        ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action>;
}

/// Show `D` while `is_open` is set.
///
/// Closing through the window's X button or a close action clears `is_open`
/// and resets the state. Returns the action the dialog produced this frame.
pub fn show_dialog<D: Dialog>(
    ctx: &Context,
    is_open: &mut bool,
    state: &mut D::State,
    dialog_ctx: D::Context<'_>,
) -> Option<D::Action> {
    if !*is_open {
        return None;
    }

    let config = D::window_config();
    if config.modal {
        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new(("dialog_backdrop", D::title(state))))
            .order(egui::Order::Middle)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.painter()
                    .rect_filled(screen, 0.0, Color32::from_black_alpha(120));
                ui.allocate_rect(screen, egui::Sense::click());
            });
    }

    let mut window_open = true;
    let mut window = egui::Window::new(D::title(state))
        .open(&mut window_open)
        .collapsible(config.collapsible)
        .resizable(config.resizable)
        .default_width(config.default_width)
        .order(egui::Order::Foreground);
    if let Some(height) = config.default_height {
        window = window.default_height(height);
    }
    if let Some((align, offset)) = config.anchor {
        window = window.anchor(align, offset);
    }

    let action = window
        .show(ctx, |ui| D::render(state, dialog_ctx, ui))
        .and_then(|response| response.inner)
        .unwrap_or(DialogAction::None);

    if action.should_close() || !window_open {
        *is_open = false;
        state.reset();
    }
    action.into_action()
}

pub mod export;
pub mod generated_code;
pub mod import_json;
pub mod save_model;
pub mod saved_models;
pub mod simulation_results;
pub mod templates;
pub mod validation_report;
pub mod versions;

pub use export::{ExportAction, ExportContext, ExportDialog, ExportState};
pub use generated_code::{GeneratedCodeContext, GeneratedCodeDialog, GeneratedCodeState};
pub use import_json::{ImportJsonAction, ImportJsonContext, ImportJsonDialog, ImportJsonState};
pub use save_model::{SaveModelAction, SaveModelContext, SaveModelDialog, SaveModelState};
pub use saved_models::{
    SavedModelsAction, SavedModelsContext, SavedModelsDialog, SavedModelsState,
};
pub use simulation_results::{
    SimulationResultsContext, SimulationResultsDialog, SimulationResultsState,
};
pub use templates::{TemplatesAction, TemplatesContext, TemplatesDialog, TemplatesState};
pub use validation_report::{
    ValidationReportContext, ValidationReportDialog, ValidationReportState,
};
pub use versions::{VersionsAction, VersionsContext, VersionsDialog, VersionsState};
