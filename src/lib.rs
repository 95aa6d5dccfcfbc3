//! # mlcanvas: drag-and-drop ML pipeline builder
//!
//! Pipelines are directed graphs of catalog components (loaders,
//! preprocessors, splitters, models, evaluators). The crate edits them with
//! full undo/redo, validates them, runs a mock simulation over canned
//! datasets, and talks to a REST backend for saving, versioning, code
//! generation and export.
//!
//! ## Architecture
//!
//! - **Engine**: [`canvas::CanvasSession`] owns the [`graph::GraphModel`], the
//!   [`history::HistoryManager`] and the pointer gesture state machine. It
//!   never draws; it pushes a [`canvas::Scene`] into a [`canvas::RenderTarget`].
//! - **Backend**: API calls and simulation runs execute on a tokio runtime in a
//!   worker thread, see [`backend`].
//! - **Frontend**: eframe/egui with egui_plot for result charts.
//! - **Communication**: crossbeam channels between the UI and the worker.
//!
//! ## Configuration
//!
//! Settings and the recoverable session live in the platform data directory
//! under `dev.mlcanvas.mlcanvas`:
//!
//! - **Linux**: `~/.local/share/dev.mlcanvas.mlcanvas/`
//! - **macOS**: `~/Library/Application Support/dev.mlcanvas.mlcanvas/`
//! - **Windows**: `%APPDATA%\dev.mlcanvas.mlcanvas\`
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use mlcanvas::{AppConfig, CanvasSession, ComponentLibrary, SceneBuffer};
//!
//! let library = Arc::new(ComponentLibrary::builtin());
//! let mut session = CanvasSession::new(SceneBuffer::new(), library, &AppConfig::default());
//! session.initialize();
//!
//! session.load_template("iris-classification");
//! assert_eq!(session.graph().nodes().len(), 4);
//! ```

pub mod api;
pub mod backend;
pub mod canvas;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod frontend;
pub mod graph;
pub mod history;
pub mod properties;
pub mod simulator;
pub mod validation;

// Re-export commonly used types
pub use api::{ApiError, HttpApi, PipelineApi};
pub use backend::{ApiBackend, BackendCommand, BackendMessage, FrontendReceiver};
pub use canvas::{CanvasSession, SceneBuffer};
pub use catalog::ComponentLibrary;
pub use config::AppConfig;
pub use error::{CanvasError, Result};
pub use frontend::MlCanvasApp;
pub use graph::{GraphModel, PipelineDocument};
pub use history::HistoryManager;
pub use simulator::Simulator;
pub use validation::{ValidationEngine, ValidationReport};
