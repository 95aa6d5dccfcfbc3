//! Background worker for backend API calls and simulation runs.
//!
//! The GUI thread never awaits anything. It sends [`BackendCommand`]s to a
//! worker thread that owns a tokio runtime, and polls [`BackendMessage`]s
//! back every frame through [`FrontendReceiver`].
//!
//! # Example
//!
//! ```ignore
//! use mlcanvas::backend::ApiBackend;
//!
//! let (backend, frontend) = ApiBackend::new(config, api, library);
//! std::thread::spawn(move || backend.run());
//!
//! frontend.list_models();
//! for msg in frontend.drain() {
//!     // update UI state
//! }
//! ```

pub mod worker;

pub use worker::BackendWorker;

use std::path::PathBuf;
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::api::{ApiResult, ModelVersion, NewVersion, PipelineApi, SavedModel, ValidationResponse};
use crate::catalog::{Component, ComponentLibrary, Template};
use crate::config::AppConfig;
use crate::error::CanvasError;
use crate::export::ExportFormat;
use crate::graph::{GraphSnapshot, PipelineDocument};
use crate::simulator::{SimulationError, SimulationEvent, SimulationRun};

/// Message sent from the UI to the worker
#[derive(Debug, Clone)]
pub enum BackendCommand {
    ListModels,
    LoadModel { id: String },
    /// Create when `id` is `None`, update otherwise
    SaveModel {
        id: Option<String>,
        document: PipelineDocument,
    },
    DeleteModel { id: String },
    LoadTemplates,
    LoadComponents,
    GenerateCode { document: PipelineDocument },
    Validate { document: PipelineDocument },
    CreateVersion {
        model_id: String,
        version: NewVersion,
    },
    ListVersions { model_id: String },
    LoadVersion { version_id: String },
    ActivateVersion { version_id: String },
    DeleteVersion { version_id: String },
    /// Fetch server artifacts and write them into `dir`
    Export {
        model_id: String,
        model_name: Option<String>,
        format: ExportFormat,
        dir: PathBuf,
    },
    Simulate { snapshot: GraphSnapshot },
    Shutdown,
}

/// Message sent from the worker to the UI
#[derive(Debug)]
pub enum BackendMessage {
    Models(ApiResult<Vec<SavedModel>>),
    ModelLoaded(ApiResult<SavedModel>),
    ModelSaved {
        name: String,
        result: ApiResult<String>,
    },
    ModelDeleted {
        id: String,
        result: ApiResult<()>,
    },
    Templates(ApiResult<Vec<Template>>),
    Components(ApiResult<Vec<Component>>),
    Code(ApiResult<String>),
    RemoteValidation(ApiResult<ValidationResponse>),
    VersionCreated(ApiResult<ModelVersion>),
    Versions(ApiResult<Vec<ModelVersion>>),
    VersionLoaded(ApiResult<ModelVersion>),
    VersionActivated(ApiResult<()>),
    VersionDeleted(ApiResult<()>),
    Exported {
        format: ExportFormat,
        result: Result<Vec<PathBuf>, CanvasError>,
    },
    Simulation(SimulationEvent),
    SimulationDone(Result<SimulationRun, SimulationError>),
    /// Worker is shutting down
    Shutdown,
}

/// UI-side handle of the worker
pub struct FrontendReceiver {
    pub receiver: Receiver<BackendMessage>,
    pub command_sender: Sender<BackendCommand>,
}

impl FrontendReceiver {
    pub fn try_recv(&self) -> Option<BackendMessage> {
        self.receiver.try_recv().ok()
    }

    /// Receive all pending messages
    pub fn drain(&self) -> Vec<BackendMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.receiver.try_recv() {
            messages.push(msg);
        }
        messages
    }

    pub fn send_command(&self, cmd: BackendCommand) -> bool {
        self.command_sender.send(cmd).is_ok()
    }

    pub fn list_models(&self) {
        let _ = self.command_sender.send(BackendCommand::ListModels);
    }

    pub fn load_templates(&self) {
        let _ = self.command_sender.send(BackendCommand::LoadTemplates);
    }

    pub fn load_components(&self) {
        let _ = self.command_sender.send(BackendCommand::LoadComponents);
    }

    pub fn simulate(&self, snapshot: GraphSnapshot) {
        let _ = self
            .command_sender
            .send(BackendCommand::Simulate { snapshot });
    }

    pub fn shutdown(&self) {
        let _ = self.command_sender.send(BackendCommand::Shutdown);
    }
}

/// The worker before it is moved onto its thread
pub struct ApiBackend {
    config: AppConfig,
    api: Arc<dyn PipelineApi>,
    library: Arc<ComponentLibrary>,
    command_receiver: Receiver<BackendCommand>,
    message_sender: Sender<BackendMessage>,
}

impl ApiBackend {
    pub fn new(
        config: AppConfig,
        api: Arc<dyn PipelineApi>,
        library: Arc<ComponentLibrary>,
    ) -> (Self, FrontendReceiver) {
        let (cmd_tx, cmd_rx) = bounded(256);
        let (msg_tx, msg_rx) = bounded(1024);

        let backend = Self {
            config,
            api,
            library,
            command_receiver: cmd_rx,
            message_sender: msg_tx,
        };

        let frontend = FrontendReceiver {
            receiver: msg_rx,
            command_sender: cmd_tx,
        };

        (backend, frontend)
    }

    /// Run the worker loop until shutdown; blocks the calling thread
    pub fn run(self) {
        let worker = BackendWorker::new(
            self.config,
            self.api,
            self.library,
            self.command_receiver,
            self.message_sender,
        );
        worker.run();
    }
}
