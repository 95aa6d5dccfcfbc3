//! Action types for the frontend
//!
//! Panels never touch the session or the worker directly. They return
//! `AppAction`s which the app applies in one place after the frame's UI has
//! been laid out.

use crate::canvas::{Point, Shortcut};
use crate::export::ExportFormat;
use crate::graph::{NodeId, ParamValue};

/// Dialogs that can be opened from the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogId {
    SaveModel,
    SavedModels,
    Templates,
    ImportJson,
    Validation,
    Export,
    Versions,
    SimulationResults,
    GeneratedCode,
}

/// Actions any panel can emit
#[derive(Debug, Clone)]
pub enum AppAction {
    // Canvas editing
    /// Add a palette component at the viewport centre
    AddComponent(String),
    /// Drop a palette component at a canvas-relative screen point
    DropComponent { component_id: String, at: Point },
    DeleteNode(NodeId),
    SetParameter {
        node: NodeId,
        name: String,
        value: ParamValue,
    },
    Shortcut(Shortcut),

    // View
    ZoomIn,
    ZoomOut,
    FitView,

    // Pipeline lifecycle
    NewPipeline,
    /// Save under a name; creates or updates depending on the loaded model
    SaveModel(String),
    LoadModel(String),
    DeleteModel(String),
    RefreshModels,
    LoadTemplate(String),
    RefreshTemplates,
    ImportJson(String),

    // Checks and runs
    Validate,
    Simulate,
    GenerateCode,
    Export(ExportFormat),

    // Versions
    CreateVersion { name: String, description: String },
    RefreshVersions,
    LoadVersion(String),
    ActivateVersion(String),
    DeleteVersion(String),

    OpenDialog(DialogId),
}
