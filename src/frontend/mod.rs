//! Frontend module for egui UI
//!
//! The app owns the [`CanvasSession`] and talks to the backend worker only
//! through crossbeam channels, so the UI thread never blocks on the network
//! or on a simulation run.
//!
//! # Layout
//!
//! - toolbar on top
//! - component palette on the left
//! - the node canvas in the centre
//! - the property panel on the right while a node is selected
//!
//! # Submodules
//!
//! - `canvas_view` - paints the scene and forwards pointer input
//! - `dialogs` - modal and floating windows
//! - `palette`, `properties_panel`, `toolbar` - side panels
//! - `state` - [`AppAction`], the single currency of UI intents

mod canvas_view;
pub mod dialogs;
mod palette;
mod properties_panel;
pub mod state;
mod toasts;
mod toolbar;

pub use state::{AppAction, DialogId};

use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use crate::api::{ApiError, ModelVersion, NewVersion, SavedModel};
use crate::backend::{BackendCommand, BackendMessage, FrontendReceiver};
use crate::canvas::{CanvasSession, Key, LoadKind, Modifiers, Notification, SceneBuffer, Shortcut};
use crate::catalog::ComponentLibrary;
use crate::config::{AppConfig, SessionStore};
use crate::export::{write_files, ExportFormat};
use crate::simulator::{NodeResult, SimulationEvent};
use crate::validation::{ValidationReport, EMPTY_PIPELINE};

use canvas_view::CanvasViewState;
use dialogs::*;
use palette::PaletteState;
use properties_panel::PropertiesPanelState;
use toasts::Toasts;
use toolbar::ToolbarContext;

/// Open flags and states of every dialog
#[derive(Default)]
struct Dialogs {
    save_open: bool,
    save: SaveModelState,
    saved_models_open: bool,
    saved_models: SavedModelsState,
    templates_open: bool,
    templates: TemplatesState,
    import_open: bool,
    import: ImportJsonState,
    validation_open: bool,
    validation: ValidationReportState,
    export_open: bool,
    export: ExportState,
    versions_open: bool,
    versions: VersionsState,
    simulation_open: bool,
    simulation: SimulationResultsState,
    code_open: bool,
    code: GeneratedCodeState,
}

impl Dialogs {
    fn flag(&mut self, id: DialogId) -> &mut bool {
        match id {
            DialogId::SaveModel => &mut self.save_open,
            DialogId::SavedModels => &mut self.saved_models_open,
            DialogId::Templates => &mut self.templates_open,
            DialogId::ImportJson => &mut self.import_open,
            DialogId::Validation => &mut self.validation_open,
            DialogId::Export => &mut self.export_open,
            DialogId::Versions => &mut self.versions_open,
            DialogId::SimulationResults => &mut self.simulation_open,
            DialogId::GeneratedCode => &mut self.code_open,
        }
    }
}

/// Progress of the latest simulation run
#[derive(Default)]
struct SimulationView {
    running: bool,
    total: usize,
    results: Vec<NodeResult>,
    error: Option<String>,
}

impl SimulationView {
    fn push(&mut self, result: NodeResult) {
        // progress events can trail the final result
        if !self.results.iter().any(|r| r.node_id == result.node_id) {
            self.results.push(result);
        }
    }
}

/// Main application state
pub struct MlCanvasApp {
    session: CanvasSession<SceneBuffer>,
    frontend: FrontendReceiver,

    toasts: Toasts,
    palette: PaletteState,
    canvas: CanvasViewState,
    properties: PropertiesPanelState,
    dialogs: Dialogs,

    models: Vec<SavedModel>,
    models_loading: bool,
    models_error: Option<String>,
    versions: Vec<ModelVersion>,
    versions_loading: bool,
    validation: Option<ValidationReport>,
    validation_pending: bool,
    code: Option<String>,
    simulation: SimulationView,
    export_busy: bool,
}

impl MlCanvasApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        frontend: FrontendReceiver,
        config: AppConfig,
        library: Arc<ComponentLibrary>,
        store: Option<Arc<dyn SessionStore>>,
    ) -> Self {
        let mut session = CanvasSession::new(SceneBuffer::new(), library, &config);
        if let Some(store) = store {
            session = session.with_store(store);
        }
        if session.restore_session() {
            tracing::info!("Recovered previous canvas session");
        } else {
            session.initialize();
        }

        // server catalog replaces the built-in one when it answers
        frontend.load_components();
        frontend.load_templates();

        Self {
            session,
            frontend,
            toasts: Toasts::default(),
            palette: PaletteState::default(),
            canvas: CanvasViewState::default(),
            properties: PropertiesPanelState::default(),
            dialogs: Dialogs::default(),
            models: Vec::new(),
            models_loading: false,
            models_error: None,
            versions: Vec::new(),
            versions_loading: false,
            validation: None,
            validation_pending: false,
            code: None,
            simulation: SimulationView::default(),
            export_busy: false,
        }
    }

    fn process_backend_messages(&mut self) -> bool {
        let messages = self.frontend.drain();
        let had_messages = !messages.is_empty();

        for msg in messages {
            match msg {
                BackendMessage::Models(result) => {
                    self.models_loading = false;
                    match result {
                        Ok(models) => {
                            self.models = models;
                            self.models_error = None;
                        }
                        Err(e) => self.models_error = Some(e.to_string()),
                    }
                }
                BackendMessage::ModelLoaded(result) => match result {
                    Ok(model) => {
                        let id = model.id.clone();
                        self.versions.clear();
                        self.session
                            .load_graph(model.into_document(), LoadKind::SavedModel { id });
                    }
                    Err(e) => self.error("Failed to load model", &e),
                },
                BackendMessage::ModelSaved { name, result } => match result {
                    Ok(id) => {
                        self.session.save_succeeded(id, &name);
                        self.refresh_models();
                    }
                    Err(e) => self.session.save_failed(&e),
                },
                BackendMessage::ModelDeleted { id, result } => match result {
                    Ok(()) => {
                        self.models.retain(|m| m.id != id);
                        self.session
                            .notify(Notification::success("Model deleted successfully"));
                    }
                    Err(e) => self.error("Failed to delete model", &e),
                },
                BackendMessage::Templates(result) => match result {
                    Ok(templates) if !templates.is_empty() => {
                        let library = ComponentLibrary::new(self.session.library().all().to_vec())
                            .with_templates(templates);
                        self.session.set_library(Arc::new(library));
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Using built-in templates: {}", e),
                },
                BackendMessage::Components(result) => match result {
                    Ok(components) if !components.is_empty() => {
                        let templates = self.session.library().templates().to_vec();
                        let library = ComponentLibrary::new(components).with_templates(templates);
                        self.session.set_library(Arc::new(library));
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Using built-in components: {}", e),
                },
                BackendMessage::Code(result) => match result {
                    Ok(code) => self.code = Some(code),
                    Err(e) => {
                        self.dialogs.code_open = false;
                        self.error("Failed to generate code", &e);
                    }
                },
                BackendMessage::RemoteValidation(result) => {
                    self.validation_pending = false;
                    if let Some(report) = self.validation.as_mut() {
                        report.merge_remote(result);
                    }
                }
                BackendMessage::VersionCreated(result) => match result {
                    Ok(version) => {
                        self.session.notify(Notification::success(format!(
                            "Version \"{}\" created",
                            version.display_name()
                        )));
                        self.refresh_versions();
                    }
                    Err(e) => self.error("Failed to create version", &e),
                },
                BackendMessage::Versions(result) => {
                    self.versions_loading = false;
                    match result {
                        Ok(versions) => self.versions = versions,
                        Err(e) => self.error("Failed to load versions", &e),
                    }
                }
                BackendMessage::VersionLoaded(result) => match result {
                    Ok(version) => {
                        let version_id = version.id.clone();
                        let name = version.display_name().to_string();
                        let mut document = version.into_document();
                        // keep the model's own name
                        document.name = self.session.model().name.clone();
                        self.session
                            .load_graph(document, LoadKind::Version { version_id });
                        self.session
                            .notify(Notification::success(format!("Loaded version \"{name}\"")));
                    }
                    Err(e) => self.error("Failed to load version", &e),
                },
                BackendMessage::VersionActivated(result) => match result {
                    Ok(()) => {
                        self.session
                            .notify(Notification::success("Version activated"));
                        self.refresh_versions();
                    }
                    Err(e) => self.error("Failed to activate version", &e),
                },
                BackendMessage::VersionDeleted(result) => match result {
                    Ok(()) => {
                        self.session.notify(Notification::success("Version deleted"));
                        self.refresh_versions();
                    }
                    Err(e) => self.error("Failed to delete version", &e),
                },
                BackendMessage::Exported { format, result } => {
                    self.export_busy = false;
                    match result {
                        Ok(paths) => {
                            tracing::info!("Wrote {} export file(s)", paths.len());
                            self.session.export_succeeded(format);
                        }
                        Err(e) => self.session.export_failed(&e),
                    }
                }
                BackendMessage::Simulation(event) => match event {
                    SimulationEvent::Started { total } => self.simulation.total = total,
                    SimulationEvent::NodeComplete(result) => self.simulation.push(result),
                    SimulationEvent::Finished { .. } | SimulationEvent::Failed { .. } => {}
                },
                BackendMessage::SimulationDone(result) => {
                    self.simulation.running = false;
                    match result {
                        Ok(run) => {
                            for result in run.ordered() {
                                self.simulation.push(result.clone());
                            }
                            self.simulation.total = run.len();
                            self.session
                                .notify(Notification::success("Simulation completed successfully"));
                        }
                        Err(e) => {
                            self.simulation.error = Some(e.to_string());
                            self.session.notify(Notification::error(e.to_string()));
                        }
                    }
                }
                BackendMessage::Shutdown => {
                    tracing::info!("Backend shutdown received");
                }
            }
        }

        had_messages
    }

    fn error(&mut self, what: &str, error: &ApiError) {
        tracing::warn!("{}: {:?}", what, error);
        self.session
            .notify(Notification::error(format!("{what}: {error}")));
    }

    fn refresh_models(&mut self) {
        self.models_loading = true;
        self.frontend.list_models();
    }

    fn refresh_versions(&mut self) {
        if let Some(model_id) = self.session.model().id.clone() {
            self.versions_loading = true;
            self.frontend
                .send_command(BackendCommand::ListVersions { model_id });
        }
    }

    fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::AddComponent(component_id) => {
                let library = self.session.library_handle();
                if let Some(component) = library.get(&component_id) {
                    // centre of the visible area, in canvas units
                    let viewport = self.session.viewport();
                    let centre = self.session.transform().screen_to_canvas(
                        crate::canvas::Point::new(viewport.width / 2.0, viewport.height / 2.0),
                    );
                    let w = self.session.settings().node_width;
                    let h = self.session.settings().node_height;
                    self.session
                        .add_node(component, centre.x - w / 2.0, centre.y - h / 2.0);
                }
            }
            AppAction::DropComponent { component_id, at } => {
                self.session.drop_component(&component_id, at);
            }
            AppAction::DeleteNode(id) => {
                self.session.delete_node(&id);
            }
            AppAction::SetParameter { node, name, value } => {
                if let Err(e) = self.session.update_node_parameter(&node, &name, value) {
                    tracing::warn!("Parameter update rejected: {}", e);
                }
            }
            AppAction::Shortcut(shortcut) => self.session.handle_shortcut(shortcut),
            AppAction::ZoomIn => self.session.zoom_in(),
            AppAction::ZoomOut => self.session.zoom_out(),
            AppAction::FitView => self.session.fit_view(),

            AppAction::NewPipeline => {
                self.versions.clear();
                self.session.new_model();
            }
            AppAction::SaveModel(name) => {
                if let Some(document) = self.session.prepare_save(&name) {
                    let id = self.session.model().id.clone();
                    self.frontend
                        .send_command(BackendCommand::SaveModel { id, document });
                }
            }
            AppAction::LoadModel(id) => {
                self.frontend.send_command(BackendCommand::LoadModel { id });
            }
            AppAction::DeleteModel(id) => {
                self.frontend.send_command(BackendCommand::DeleteModel { id });
            }
            AppAction::RefreshModels => self.refresh_models(),
            AppAction::LoadTemplate(id) => {
                self.session.load_template(&id);
            }
            AppAction::RefreshTemplates => self.frontend.load_templates(),
            AppAction::ImportJson(text) => {
                if self.session.import_json(&text).is_ok() {
                    self.dialogs.import_open = false;
                    self.dialogs.import.reset();
                }
            }

            AppAction::Validate => {
                let report = self.session.validate();
                let remote = !self.session.graph().is_empty();
                self.validation = Some(report);
                self.validation_pending = remote;
                if remote {
                    self.frontend.send_command(BackendCommand::Validate {
                        document: self.session.export_document(),
                    });
                }
                self.dialogs.validation_open = true;
            }
            AppAction::Simulate => {
                if self.session.graph().is_empty() {
                    self.session.notify(Notification::error(EMPTY_PIPELINE));
                    return;
                }
                self.simulation = SimulationView {
                    running: true,
                    total: self.session.graph().nodes().len(),
                    ..SimulationView::default()
                };
                self.dialogs.simulation = SimulationResultsState::default();
                self.dialogs.simulation_open = true;
                self.frontend.simulate(self.session.graph().snapshot());
            }
            AppAction::GenerateCode => {
                if self.session.graph().is_empty() {
                    self.session.notify(Notification::error(EMPTY_PIPELINE));
                    return;
                }
                self.code = None;
                self.dialogs.code_open = true;
                self.frontend.send_command(BackendCommand::GenerateCode {
                    document: self.session.export_document(),
                });
            }
            AppAction::Export(format) => self.export(format),

            AppAction::CreateVersion { name, description } => {
                let Some(model_id) = self.session.model().id.clone() else {
                    self.session
                        .notify(Notification::warning("Save the model before creating versions."));
                    return;
                };
                let graph = self.session.graph();
                let version = NewVersion {
                    name,
                    description,
                    nodes: graph.nodes().to_vec(),
                    edges: graph.edges().to_vec(),
                    generate_code: true,
                    metadata: json!({
                        "nodeCount": graph.nodes().len(),
                        "edgeCount": graph.edges().len(),
                    }),
                };
                self.frontend
                    .send_command(BackendCommand::CreateVersion { model_id, version });
            }
            AppAction::RefreshVersions => self.refresh_versions(),
            AppAction::LoadVersion(version_id) => {
                self.frontend
                    .send_command(BackendCommand::LoadVersion { version_id });
            }
            AppAction::ActivateVersion(version_id) => {
                self.frontend
                    .send_command(BackendCommand::ActivateVersion { version_id });
            }
            AppAction::DeleteVersion(version_id) => {
                self.frontend
                    .send_command(BackendCommand::DeleteVersion { version_id });
            }

            AppAction::OpenDialog(id) => *self.dialogs.flag(id) = true,
        }
    }

    fn export(&mut self, format: ExportFormat) {
        if format == ExportFormat::Json {
            let Some(file) = self.session.export_json() else {
                return;
            };
            let Some(path) = rfd::FileDialog::new()
                .set_file_name(&file.filename)
                .add_filter("JSON", &["json"])
                .save_file()
            else {
                return;
            };
            let dir = path.parent().unwrap_or(Path::new("."));
            let named = crate::export::ExportFile {
                filename: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or(file.filename),
                contents: file.contents,
            };
            match write_files(dir, std::slice::from_ref(&named)) {
                Ok(_) => self.session.export_succeeded(format),
                Err(e) => self.session.export_failed(&e),
            }
            return;
        }

        let Some(model_id) = self.session.export_target(format) else {
            return;
        };
        let Some(dir) = rfd::FileDialog::new()
            .set_title(format!("Export {}", format.display_name()))
            .pick_folder()
        else {
            return;
        };
        self.export_busy = true;
        self.frontend.send_command(BackendCommand::Export {
            model_id,
            model_name: self.session.model().name.clone(),
            format,
            dir,
        });
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let text_focused = ctx.wants_keyboard_input();
        let pressed: Vec<(Key, Modifiers)> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => Some((map_key(*key), map_modifiers(modifiers))),
                    _ => None,
                })
                .collect()
        });

        for (key, modifiers) in pressed {
            if let Some(shortcut) = Shortcut::resolve(key, modifiers, text_focused) {
                tracing::debug!(?shortcut, "Keyboard shortcut");
                self.session.handle_shortcut(shortcut);
            }
        }
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) -> Vec<AppAction> {
        let mut actions = Vec::new();
        let model = self.session.model().clone();

        if let Some(SaveModelAction::Save(name)) = show_dialog::<SaveModelDialog>(
            ctx,
            &mut self.dialogs.save_open,
            &mut self.dialogs.save,
            SaveModelContext {
                current_name: model.name.as_deref(),
                is_saved: model.id.is_some(),
            },
        ) {
            actions.push(AppAction::SaveModel(name));
        }

        if let Some(action) = show_dialog::<SavedModelsDialog>(
            ctx,
            &mut self.dialogs.saved_models_open,
            &mut self.dialogs.saved_models,
            SavedModelsContext {
                models: &self.models,
                loading: self.models_loading,
                error: self.models_error.as_deref(),
            },
        ) {
            actions.push(match action {
                SavedModelsAction::Load(id) => AppAction::LoadModel(id),
                SavedModelsAction::Delete(id) => AppAction::DeleteModel(id),
                SavedModelsAction::Refresh => AppAction::RefreshModels,
            });
        }

        let library = self.session.library_handle();
        if let Some(action) = show_dialog::<TemplatesDialog>(
            ctx,
            &mut self.dialogs.templates_open,
            &mut self.dialogs.templates,
            TemplatesContext {
                templates: library.templates(),
            },
        ) {
            actions.push(match action {
                TemplatesAction::Load(id) => AppAction::LoadTemplate(id),
                TemplatesAction::Refresh => AppAction::RefreshTemplates,
            });
        }

        if let Some(ImportJsonAction::Import(text)) = show_dialog::<ImportJsonDialog>(
            ctx,
            &mut self.dialogs.import_open,
            &mut self.dialogs.import,
            ImportJsonContext,
        ) {
            actions.push(AppAction::ImportJson(text));
        }

        show_dialog::<ValidationReportDialog>(
            ctx,
            &mut self.dialogs.validation_open,
            &mut self.dialogs.validation,
            ValidationReportContext {
                report: self.validation.as_ref(),
                pending_remote: self.validation_pending,
            },
        );

        if let Some(ExportAction::Export(format)) = show_dialog::<ExportDialog>(
            ctx,
            &mut self.dialogs.export_open,
            &mut self.dialogs.export,
            ExportContext {
                is_saved: model.id.is_some(),
                busy: self.export_busy,
            },
        ) {
            actions.push(AppAction::Export(format));
        }

        if let Some(action) = show_dialog::<VersionsDialog>(
            ctx,
            &mut self.dialogs.versions_open,
            &mut self.dialogs.versions,
            VersionsContext {
                model_name: model.name.as_deref(),
                is_saved: model.id.is_some(),
                versions: &self.versions,
                loading: self.versions_loading,
            },
        ) {
            actions.push(match action {
                VersionsAction::Create { name, description } => {
                    AppAction::CreateVersion { name, description }
                }
                VersionsAction::Load(id) => AppAction::LoadVersion(id),
                VersionsAction::Activate(id) => AppAction::ActivateVersion(id),
                VersionsAction::Delete(id) => AppAction::DeleteVersion(id),
                VersionsAction::Refresh => AppAction::RefreshVersions,
            });
        }

        show_dialog::<SimulationResultsDialog>(
            ctx,
            &mut self.dialogs.simulation_open,
            &mut self.dialogs.simulation,
            SimulationResultsContext {
                results: &self.simulation.results,
                total: self.simulation.total,
                running: self.simulation.running,
                error: self.simulation.error.as_deref(),
            },
        );

        show_dialog::<GeneratedCodeDialog>(
            ctx,
            &mut self.dialogs.code_open,
            &mut self.dialogs.code,
            GeneratedCodeContext {
                code: self.code.as_deref(),
            },
        );

        actions
    }
}

impl eframe::App for MlCanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_messages = self.process_backend_messages();
        self.handle_keyboard_shortcuts(ctx);

        if had_messages || self.simulation.running || self.export_busy {
            ctx.request_repaint();
        }

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let toolbar_ctx = ToolbarContext {
                model: self.session.model(),
                history: self.session.target().history.as_ref(),
                zoom_label: self.session.zoom_label(),
                simulating: self.simulation.running,
                node_count: self.session.graph().nodes().len(),
            };
            actions.extend(toolbar::render_toolbar(ui, &toolbar_ctx));
        });

        egui::SidePanel::left("palette")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                let library = self.session.library_handle();
                actions.extend(palette::render_palette(ui, &mut self.palette, &library));
            });

        if let Some(form) = self.session.property_form() {
            egui::SidePanel::right("properties")
                .resizable(true)
                .default_width(280.0)
                .show(ctx, |ui| {
                    actions.extend(properties_panel::render_properties(
                        ui,
                        &mut self.properties,
                        &form,
                    ));
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                actions.extend(canvas_view::render_canvas(
                    ui,
                    &mut self.canvas,
                    &mut self.session,
                ));
            });

        actions.extend(self.render_dialogs(ctx));

        for action in actions {
            self.handle_action(action);
        }

        self.toasts
            .extend(self.session.target_mut().drain_notifications());
        self.toasts.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.save_session();
        self.frontend.shutdown();
    }
}

fn map_key(key: egui::Key) -> Key {
    match key {
        egui::Key::Z => Key::Z,
        egui::Key::Y => Key::Y,
        egui::Key::Delete => Key::Delete,
        egui::Key::Backspace => Key::Backspace,
        egui::Key::Escape => Key::Escape,
        _ => Key::Other,
    }
}

fn map_modifiers(m: &egui::Modifiers) -> Modifiers {
    Modifiers {
        ctrl: m.ctrl,
        shift: m.shift,
        alt: m.alt,
        command: m.mac_cmd,
    }
}
