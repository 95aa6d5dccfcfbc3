//! Worker thread implementation.
//!
//! Each command becomes a task on a private tokio runtime so a slow request
//! or a running simulation never holds up the next command. Results are
//! sent back in completion order.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use tokio::runtime::Runtime;

use super::{BackendCommand, BackendMessage};
use crate::api::PipelineApi;
use crate::catalog::ComponentLibrary;
use crate::config::AppConfig;
use crate::error::CanvasError;
use crate::export::{artifact_files, write_files};
use crate::simulator::{SimulationEvent, Simulator};

pub struct BackendWorker {
    config: AppConfig,
    api: Arc<dyn PipelineApi>,
    library: Arc<ComponentLibrary>,
    command_rx: Receiver<BackendCommand>,
    message_tx: Sender<BackendMessage>,
}

impl BackendWorker {
    pub fn new(
        config: AppConfig,
        api: Arc<dyn PipelineApi>,
        library: Arc<ComponentLibrary>,
        command_rx: Receiver<BackendCommand>,
        message_tx: Sender<BackendMessage>,
    ) -> Self {
        Self {
            config,
            api,
            library,
            command_rx,
            message_tx,
        }
    }

    pub fn run(self) {
        tracing::info!("Backend worker started");

        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("mlcanvas-io")
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!("Failed to start async runtime: {}", e);
                let _ = self.message_tx.send(BackendMessage::Shutdown);
                return;
            }
        };

        // a closed command channel means the UI is gone
        while let Ok(cmd) = self.command_rx.recv() {
            if matches!(cmd, BackendCommand::Shutdown) {
                break;
            }
            self.dispatch(&runtime, cmd);
        }

        runtime.shutdown_timeout(Duration::from_secs(1));
        let _ = self.message_tx.send(BackendMessage::Shutdown);
        tracing::info!("Backend worker stopped");
    }

    fn dispatch(&self, runtime: &Runtime, cmd: BackendCommand) {
        tracing::debug!("Backend command: {:?}", std::mem::discriminant(&cmd));

        let api = Arc::clone(&self.api);
        let tx = self.message_tx.clone();

        match cmd {
            BackendCommand::Simulate { snapshot } => {
                let (event_tx, event_rx) = crossbeam_channel::unbounded::<SimulationEvent>();
                let simulator = Simulator::new(Arc::clone(&self.library), self.config.simulation.clone())
                    .with_events(event_tx);

                // forward progress while the run is in flight
                let forward_tx = tx.clone();
                std::thread::spawn(move || {
                    for event in event_rx {
                        if forward_tx.send(BackendMessage::Simulation(event)).is_err() {
                            break;
                        }
                    }
                });

                runtime.spawn(async move {
                    let result = simulator.run(&snapshot.nodes, &snapshot.edges).await;
                    drop(simulator);
                    let _ = tx.send(BackendMessage::SimulationDone(result));
                });
            }
            cmd => {
                runtime.spawn(async move {
                    let msg = execute(api.as_ref(), cmd).await;
                    if let Some(msg) = msg {
                        let _ = tx.send(msg);
                    }
                });
            }
        }
    }
}

/// Run one API command to completion.
async fn execute(api: &dyn PipelineApi, cmd: BackendCommand) -> Option<BackendMessage> {
    let msg = match cmd {
        BackendCommand::ListModels => BackendMessage::Models(api.list_models().await),
        BackendCommand::LoadModel { id } => BackendMessage::ModelLoaded(api.get_model(&id).await),
        BackendCommand::SaveModel { id, document } => {
            let name = document.name.clone().unwrap_or_default();
            let result = match id {
                Some(id) => api.update_model(&id, &document).await.map(|_| id),
                None => api.create_model(&document).await.map(|created| created.id),
            };
            BackendMessage::ModelSaved { name, result }
        }
        BackendCommand::DeleteModel { id } => {
            let result = api.delete_model(&id).await;
            BackendMessage::ModelDeleted { id, result }
        }
        BackendCommand::LoadTemplates => BackendMessage::Templates(api.templates().await),
        BackendCommand::LoadComponents => BackendMessage::Components(api.components().await),
        BackendCommand::GenerateCode { document } => {
            BackendMessage::Code(api.generate_code(&document).await.map(|c| c.code))
        }
        BackendCommand::Validate { document } => {
            BackendMessage::RemoteValidation(api.validate(&document).await)
        }
        BackendCommand::CreateVersion { model_id, version } => {
            BackendMessage::VersionCreated(api.create_version(&model_id, &version).await)
        }
        BackendCommand::ListVersions { model_id } => {
            BackendMessage::Versions(api.list_versions(&model_id).await)
        }
        BackendCommand::LoadVersion { version_id } => {
            BackendMessage::VersionLoaded(api.get_version(&version_id).await)
        }
        BackendCommand::ActivateVersion { version_id } => {
            BackendMessage::VersionActivated(api.activate_version(&version_id).await)
        }
        BackendCommand::DeleteVersion { version_id } => {
            BackendMessage::VersionDeleted(api.delete_version(&version_id).await)
        }
        BackendCommand::Export {
            model_id,
            model_name,
            format,
            dir,
        } => {
            let result = async {
                let artifacts = api.export(&model_id, format).await?;
                let files = artifact_files(format, &artifacts, model_name.as_deref())?;
                let written = write_files(&dir, &files)?;
                Ok::<_, CanvasError>(written)
            }
            .await;
            BackendMessage::Exported { format, result }
        }
        BackendCommand::Simulate { .. } | BackendCommand::Shutdown => return None,
    };
    Some(msg)
}
