//! The editing session: graph, history, gestures and view state in one owner.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::geometry::{output_handle, EdgePath, Point, Viewport};
use super::gesture::{GestureState, PointerButton, Shortcut};
use super::hit::{hit_test, HitTarget};
use super::scene::{edge_shapes, Notification, NodeShape, RenderTarget, Scene};
use super::transform::Transform;
use crate::api::ApiError;
use crate::catalog::{Component, ComponentLibrary};
use crate::config::{read_json, write_json, AppConfig, CanvasSettings, SessionStore};
use crate::export::{json_export, ExportFile, ExportFormat};
use crate::graph::{
    ConnectOutcome, Edge, EdgeId, GraphModel, GraphResult, IdAllocator, ImportError, Node, NodeId,
    ParamValue, PipelineDocument, Position,
};
use crate::history::{HistoryAction, HistoryManager};
use crate::properties::PropertyForm;
use crate::validation::{ValidationEngine, ValidationReport};

/// Session store key of the recoverable canvas state.
pub const SESSION_KEY: &str = "canvas_session";

/// The saved model currently being edited, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelInfo {
    /// Server id; `None` until the pipeline is saved.
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Where a wholesale graph replacement came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadKind {
    Template { id: String, name: String },
    Version { version_id: String },
    Import,
    SavedModel { id: String },
}

/// Canvas state written to the session store for recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSessionState {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub transform: Transform,
    pub timestamp: i64,
    pub next_node_id: u64,
    pub next_edge_id: u64,
}

/// One pipeline editor instance.
///
/// Every mutation goes through `&mut self`, records history where applicable,
/// and pushes the result to the render target.
pub struct CanvasSession<R: RenderTarget> {
    graph: GraphModel,
    history: HistoryManager,
    library: Arc<ComponentLibrary>,
    settings: CanvasSettings,
    transform: Transform,
    viewport: Viewport,
    gesture: GestureState,
    selected: Option<NodeId>,
    model: ModelInfo,
    store: Option<Arc<dyn SessionStore>>,
    target: R,
}

impl<R: RenderTarget> CanvasSession<R> {
    pub fn new(target: R, library: Arc<ComponentLibrary>, config: &AppConfig) -> Self {
        Self {
            graph: GraphModel::new(),
            history: HistoryManager::new(&config.history),
            library,
            settings: config.canvas.clone(),
            transform: Transform::default(),
            viewport: Viewport::default(),
            gesture: GestureState::Idle,
            selected: None,
            model: ModelInfo::default(),
            store: None,
            target,
        }
    }

    /// Persist session state and the history tail to `store`.
    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.history = std::mem::take(&mut self.history).with_store(store.clone());
        self.store = Some(store);
        self
    }

    /// Record the initial state and draw it.
    pub fn initialize(&mut self) {
        self.history.clear();
        self.history
            .record_state(&self.graph.snapshot(), HistoryAction::Init, json!({}));
        self.refresh();
    }

    // ==================== Accessors ====================

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Swap in a catalog fetched from the backend. Existing nodes keep their data.
    pub fn set_library(&mut self, library: Arc<ComponentLibrary>) {
        tracing::info!(
            "Component library replaced: {} components, {} templates",
            library.len(),
            library.templates().len()
        );
        self.library = library;
    }

    pub fn library_handle(&self) -> Arc<ComponentLibrary> {
        Arc::clone(&self.library)
    }

    pub fn library(&self) -> &ComponentLibrary {
        &self.library
    }

    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selected.as_ref().and_then(|id| self.graph.node(id))
    }

    pub fn model(&self) -> &ModelInfo {
        &self.model
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut R {
        &mut self.target
    }

    pub fn zoom_label(&self) -> String {
        self.transform.zoom_label()
    }

    pub fn scene(&self) -> Scene {
        Scene::build(&self.graph, &self.settings)
    }

    // ==================== Graph operations ====================

    /// Add a node for `component` at canvas position (`x`, `y`) and select it.
    pub fn add_node(&mut self, component: &Component, x: f64, y: f64) -> Node {
        let node = self.graph.add_node(component, x, y);
        self.record(
            HistoryAction::AddNode,
            json!({ "nodeId": node.id, "componentId": component.id }),
        );
        self.render();
        self.select_node(Some(node.id.clone()));
        node
    }

    /// Palette drop at a screen point.
    pub fn drop_component(&mut self, component_id: &str, screen: Point) -> Option<Node> {
        let library = Arc::clone(&self.library);
        let Some(component) = library.get(component_id) else {
            tracing::warn!("Dropped unknown component {}", component_id);
            self.notify(Notification::error("Component not found"));
            return None;
        };
        let p = self.transform.screen_to_canvas(screen);
        Some(self.add_node(component, p.x, p.y))
    }

    /// Remove a node and its edges. Recorded even when `id` is unknown.
    pub fn delete_node(&mut self, id: &NodeId) -> Option<Node> {
        let removed = self.graph.remove_node(id);
        self.record(
            HistoryAction::DeleteNode,
            json!({ "nodeId": id, "label": removed.as_ref().map(|n| n.label()) }),
        );
        if self.selected.as_ref() == Some(id) {
            self.select_node(None);
        }
        self.render();
        removed
    }

    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> GraphResult<ConnectOutcome> {
        let outcome = match self.graph.connect(source, target) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!("Connection rejected: {}", e);
                return Err(e);
            }
        };

        match &outcome {
            ConnectOutcome::Connected(edge) => {
                self.record(
                    HistoryAction::AddEdge,
                    json!({ "edgeId": edge.id, "source": edge.source, "target": edge.target }),
                );
                self.render();
                self.notify(Notification::success("Nodes connected"));
            }
            ConnectOutcome::Duplicate(_) => {
                self.notify(Notification::warning("Connection already exists"));
            }
        }
        Ok(outcome)
    }

    /// Remove an edge. Unknown ids change nothing and record nothing.
    pub fn delete_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let edge = self.graph.remove_edge(id)?;
        let label = |node: &NodeId| {
            self.graph
                .node(node)
                .map(|n| n.label().to_string())
                .unwrap_or_else(|| "Unknown".to_string())
        };
        let message = format!("Disconnected: {} → {}", label(&edge.source), label(&edge.target));

        self.record(
            HistoryAction::DeleteEdge,
            json!({ "edgeId": edge.id, "source": edge.source, "target": edge.target }),
        );
        self.render();
        self.notify(Notification::info(message));
        Some(edge)
    }

    pub fn update_node_parameter(
        &mut self,
        node_id: &NodeId,
        key: &str,
        value: ParamValue,
    ) -> GraphResult<()> {
        self.graph.set_parameter(node_id, key, value)?;
        let label = self.graph.node(node_id).map(|n| n.label().to_string());
        self.record(
            HistoryAction::UpdateParams,
            json!({ "nodeId": node_id, "label": label, "parameter": key }),
        );
        self.render();
        Ok(())
    }

    /// Select a node (or clear the selection, hiding the property panel).
    pub fn select_node(&mut self, id: Option<NodeId>) {
        self.selected = id.filter(|id| self.graph.contains_node(id));
        self.target.select(self.selected.as_ref());
    }

    /// Form for the selected node.
    pub fn property_form(&self) -> Option<PropertyForm> {
        let node = self.selected_node()?;
        Some(PropertyForm::build(&self.library, node))
    }

    pub fn validate(&self) -> ValidationReport {
        ValidationEngine::new(&self.library).validate(&self.graph)
    }

    // ==================== Whole-graph operations ====================

    /// Replace the graph wholesale.
    pub fn load_graph(&mut self, document: PipelineDocument, kind: LoadKind) {
        let node_count = document.nodes.len();
        tracing::info!(?kind, nodes = node_count, "Loading pipeline");

        self.history.pause();
        match document.ids {
            Some(ids) => self
                .graph
                .replace_with_ids(document.nodes, document.edges, ids),
            None => self.graph.replace(document.nodes, document.edges),
        }
        self.gesture = GestureState::Idle;
        self.target.set_guide(None);
        self.history.resume();

        self.render();
        self.select_node(None);

        match kind {
            LoadKind::Template { id, name } => {
                self.model = ModelInfo {
                    id: None,
                    name: document.name.or_else(|| Some(name.clone())),
                };
                self.record(
                    HistoryAction::LoadTemplate,
                    json!({ "templateId": id, "templateName": name, "nodeCount": node_count }),
                );
                self.fit_view();
                self.notify(Notification::success(format!("Loaded template \"{name}\"")));
            }
            LoadKind::Version { version_id } => {
                self.record(
                    HistoryAction::LoadVersion,
                    json!({ "versionId": version_id, "timestamp": chrono::Utc::now().timestamp_millis() }),
                );
            }
            LoadKind::Import => {
                self.model = ModelInfo {
                    id: None,
                    name: document.name,
                };
                // Raw imports leave history alone; only the session file is refreshed.
                self.save_session();
                self.fit_view();
                self.notify(Notification::success("Model imported successfully"));
            }
            LoadKind::SavedModel { id } => {
                let name = document.name.unwrap_or_default();
                self.model = ModelInfo {
                    id: Some(id),
                    name: Some(name.clone()),
                };
                // A freshly opened model starts its own history.
                self.history.clear();
                self.record(HistoryAction::Init, json!({}));
                self.fit_view();
                self.notify(Notification::success(format!("Loaded \"{name}\"")));
            }
        }
    }

    pub fn load_template(&mut self, template_id: &str) -> bool {
        let library = Arc::clone(&self.library);
        let Some(template) = library.template(template_id) else {
            self.notify(Notification::error("Template not found"));
            return false;
        };
        let document = template.instantiate(&library);
        self.load_graph(
            document,
            LoadKind::Template {
                id: template.id.clone(),
                name: template.name.clone(),
            },
        );
        true
    }

    /// Import pasted JSON. A rejected import leaves the graph untouched.
    pub fn import_json(&mut self, text: &str) -> Result<(), ImportError> {
        match PipelineDocument::parse_import(text) {
            Ok(document) => {
                self.load_graph(document, LoadKind::Import);
                Ok(())
            }
            Err(e) => {
                self.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Current pipeline as a document, including id counters.
    pub fn export_document(&self) -> PipelineDocument {
        PipelineDocument {
            name: self.model.name.clone(),
            description: None,
            nodes: self.graph.nodes().to_vec(),
            edges: self.graph.edges().to_vec(),
            ids: Some(self.graph.ids()),
        }
    }

    pub fn new_model(&mut self) {
        self.graph.clear();
        self.model = ModelInfo::default();
        self.gesture = GestureState::Idle;
        self.target.set_guide(None);
        self.history.clear();
        self.record(HistoryAction::Init, json!({}));
        self.render();
        self.select_node(None);
        self.notify(Notification::success("New pipeline created"));
    }

    // ==================== Saving ====================

    /// Check that the pipeline may be saved under `name` and build the payload.
    pub fn prepare_save(&mut self, name: &str) -> Option<PipelineDocument> {
        let name = name.trim();
        if name.is_empty() {
            self.notify(Notification::error("Please enter a model name"));
            return None;
        }
        if self.graph.is_empty() {
            self.notify(Notification::error("Cannot save empty pipeline"));
            return None;
        }
        Some(PipelineDocument {
            name: Some(name.to_string()),
            ..self.export_document()
        })
    }

    /// The backend accepted a save; `id` is the server id of the model.
    pub fn save_succeeded(&mut self, id: String, name: &str) {
        let updated = self.model.id.as_deref() == Some(id.as_str());
        self.model = ModelInfo {
            id: Some(id),
            name: Some(name.trim().to_string()),
        };
        let message = if updated {
            "Model updated successfully"
        } else {
            "Model saved successfully"
        };
        self.notify(Notification::success(message));
    }

    pub fn save_failed(&mut self, error: &ApiError) {
        let message = if error.is_auth_required() {
            "Please sign in to save models".to_string()
        } else {
            format!("Failed to save model: {error}")
        };
        self.notify(Notification::error(message));
    }

    // ==================== Export ====================

    /// Model id to export from, or `None` when the format needs a saved model
    /// and there is none yet. JSON exports yield an empty id.
    pub fn export_target(&mut self, format: ExportFormat) -> Option<String> {
        match format.check_ready(self.model.id.as_deref()) {
            Ok(id) => Some(id.unwrap_or_default().to_string()),
            Err(e) => {
                self.notify(Notification::warning(e.to_string()));
                None
            }
        }
    }

    /// Build the local JSON download of the canvas.
    pub fn export_json(&mut self) -> Option<ExportFile> {
        match json_export(
            self.model.name.as_deref(),
            self.graph.nodes(),
            self.graph.edges(),
            Utc::now(),
        ) {
            Ok(file) => Some(file),
            Err(e) => {
                self.export_failed(&e);
                None
            }
        }
    }

    pub fn export_succeeded(&mut self, format: ExportFormat) {
        tracing::info!("{} export written", format.display_name());
        self.notify(Notification::success(format.success_message()));
    }

    pub fn export_failed(&mut self, error: &dyn std::fmt::Display) {
        self.notify(Notification::error(format!("Export failed: {error}")));
    }

    // ==================== Undo / redo ====================

    pub fn undo(&mut self) -> bool {
        let label = self
            .history
            .last_action()
            .map(|a| a.label().to_string())
            .unwrap_or_default();
        match self.history.undo() {
            Some(snapshot) => {
                self.apply_history(snapshot);
                self.notify(Notification::info(format!("Undo: {label}")));
                true
            }
            None => {
                self.notify(Notification::info("Nothing to undo"));
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        let label = self
            .history
            .next_action()
            .map(|a| a.label().to_string())
            .unwrap_or_default();
        match self.history.redo() {
            Some(snapshot) => {
                self.apply_history(snapshot);
                self.notify(Notification::info(format!("Redo: {label}")));
                true
            }
            None => {
                self.notify(Notification::info("Nothing to redo"));
                false
            }
        }
    }

    fn apply_history(&mut self, snapshot: crate::graph::GraphSnapshot) {
        self.history.pause();
        self.graph.restore(snapshot);
        self.gesture = GestureState::Idle;
        self.target.set_guide(None);
        self.render();
        self.select_node(None);
        self.history.resume();
        self.target.history_changed(&self.history.status());
        self.save_session();
    }

    pub fn handle_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::Undo => {
                self.undo();
            }
            Shortcut::Redo => {
                self.redo();
            }
            Shortcut::DeleteSelection => {
                if let Some(id) = self.selected.clone() {
                    self.delete_node(&id);
                }
            }
            Shortcut::CancelGesture => self.cancel_gesture(),
        }
    }

    // ==================== Pointer gestures ====================

    /// Press at `screen`, relative to the canvas' top-left corner.
    pub fn pointer_down(&mut self, screen: Point, button: PointerButton) {
        if button != PointerButton::Primary || !self.gesture.is_idle() {
            return;
        }
        let p = self.transform.screen_to_canvas(screen);

        match hit_test(&self.graph, p, &self.settings) {
            HitTarget::Background => {
                self.gesture = GestureState::Panning {
                    origin: screen - self.transform.translation(),
                };
            }
            HitTarget::NodeBody(id) => {
                let Some(node) = self.graph.node(&id) else {
                    return;
                };
                let node_start = node.position;
                self.select_node(Some(id.clone()));
                self.gesture = GestureState::DraggingNode {
                    node: id,
                    pointer_start: screen,
                    node_start,
                };
            }
            HitTarget::OutputHandle(id) => {
                self.gesture = GestureState::Connecting {
                    source: id,
                    pointer: p,
                };
                self.update_guide();
            }
            HitTarget::InputHandle(_) => {}
            HitTarget::Edge(id) => {
                self.delete_edge(&id);
            }
        }
        tracing::trace!(gesture = self.gesture.name(), "Pointer down");
    }

    pub fn pointer_move(&mut self, screen: Point) {
        match &mut self.gesture {
            GestureState::Idle => {}
            GestureState::Panning { origin } => {
                self.transform.x = screen.x - origin.x;
                self.transform.y = screen.y - origin.y;
                self.target.set_transform(&self.transform);
            }
            GestureState::DraggingNode {
                node,
                pointer_start,
                node_start,
            } => {
                let delta = (screen - *pointer_start).scale(1.0 / self.transform.scale);
                let position = Position::new(node_start.x + delta.x, node_start.y + delta.y);
                let id = node.clone();
                if self.graph.move_node(&id, position).is_ok() {
                    self.redraw_node(&id);
                }
            }
            GestureState::Connecting { pointer, .. } => {
                *pointer = self.transform.screen_to_canvas(screen);
                self.update_guide();
            }
        }
    }

    pub fn pointer_up(&mut self, screen: Point) {
        let gesture = std::mem::take(&mut self.gesture);
        tracing::trace!(gesture = gesture.name(), "Pointer up");

        match gesture {
            GestureState::Connecting { source, .. } => {
                self.target.set_guide(None);
                let p = self.transform.screen_to_canvas(screen);
                if let HitTarget::InputHandle(target) = hit_test(&self.graph, p, &self.settings) {
                    if target != source {
                        // Rejections are already logged by `connect`.
                        let _ = self.connect(&source, &target);
                    }
                }
            }
            GestureState::Panning { .. } | GestureState::DraggingNode { .. } => {
                self.save_session();
            }
            GestureState::Idle => {}
        }
    }

    /// The pointer left the canvas; only panning is tied to the canvas area.
    pub fn pointer_leave(&mut self) {
        if matches!(self.gesture, GestureState::Panning { .. }) {
            self.gesture = GestureState::Idle;
            self.save_session();
        }
    }

    /// Click without drag; empty background clears the selection.
    pub fn click(&mut self, screen: Point) {
        let p = self.transform.screen_to_canvas(screen);
        if hit_test(&self.graph, p, &self.settings) == HitTarget::Background {
            self.select_node(None);
        }
    }

    pub fn cancel_gesture(&mut self) {
        if let GestureState::Connecting { .. } = self.gesture {
            self.target.set_guide(None);
        }
        self.gesture = GestureState::Idle;
    }

    // ==================== View ====================

    /// Mouse wheel zoom anchored at `screen`.
    pub fn wheel(&mut self, screen: Point, delta_y: f64) {
        let step = if delta_y > 0.0 {
            -self.settings.wheel_zoom_step
        } else {
            self.settings.wheel_zoom_step
        };
        let scale = self.settings.clamp_scale(self.transform.scale + step);
        self.transform.zoom_at(screen, scale);
        self.target.set_transform(&self.transform);
    }

    /// Toolbar zoom; keeps the translation as is.
    pub fn zoom_by(&mut self, delta: f64) {
        self.transform.scale = self.settings.clamp_scale(self.transform.scale + delta);
        self.target.set_transform(&self.transform);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(self.settings.button_zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(-self.settings.button_zoom_step);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Centre every node in the viewport. Does nothing for an empty graph.
    pub fn fit_view(&mut self) {
        if let Some(transform) = Transform::fit(self.graph.nodes(), self.viewport, &self.settings) {
            self.transform = transform;
            self.target.set_transform(&self.transform);
        }
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = Transform {
            scale: self.settings.clamp_scale(transform.scale),
            ..transform
        };
        self.target.set_transform(&self.transform);
    }

    // ==================== Session persistence ====================

    pub fn session_state(&self) -> CanvasSessionState {
        let ids = self.graph.ids();
        CanvasSessionState {
            nodes: self.graph.nodes().to_vec(),
            edges: self.graph.edges().to_vec(),
            transform: self.transform,
            timestamp: chrono::Utc::now().timestamp_millis(),
            next_node_id: ids.last_node + 1,
            next_edge_id: ids.last_edge + 1,
        }
    }

    /// Best-effort write of the recoverable state.
    pub fn save_session(&self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        if let Err(e) = write_json(store.as_ref(), SESSION_KEY, &self.session_state()) {
            tracing::warn!("Failed to save canvas session: {}", e);
        }
    }

    /// Reload the graph, view and history saved by a previous session.
    ///
    /// Returns false (and leaves the session untouched) when nothing was saved.
    pub fn restore_session(&mut self) -> bool {
        let Some(store) = self.store.clone() else {
            return false;
        };
        let state = match read_json::<CanvasSessionState>(store.as_ref(), SESSION_KEY) {
            Ok(Some(state)) => state,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("Failed to restore canvas session: {}", e);
                return false;
            }
        };

        tracing::info!(nodes = state.nodes.len(), "Restoring canvas session");
        let ids = IdAllocator {
            last_node: state.next_node_id.saturating_sub(1),
            last_edge: state.next_edge_id.saturating_sub(1),
        };
        self.graph.replace_with_ids(state.nodes, state.edges, ids);
        self.set_transform(state.transform);
        self.selected = None;

        let snapshot = self.graph.snapshot();
        let history_matches = self.history.restore()
            && self.history.top_state().is_some_and(|top| *top == snapshot);
        if !history_matches {
            self.history.clear();
            self.history
                .record_state(&snapshot, HistoryAction::Init, json!({}));
        }
        self.refresh();
        true
    }

    // ==================== Internals ====================

    fn record(&mut self, action: HistoryAction, metadata: Value) {
        self.history
            .record_state(&self.graph.snapshot(), action, metadata);
        self.target.history_changed(&self.history.status());
        self.save_session();
    }

    fn render(&mut self) {
        let scene = self.scene();
        self.target.render(&scene);
    }

    fn refresh(&mut self) {
        self.render();
        self.target.set_transform(&self.transform);
        self.target.select(self.selected.as_ref());
        self.target.history_changed(&self.history.status());
    }

    /// Forward a transient message to the render target.
    pub fn notify(&mut self, notification: Notification) {
        self.target.notify(notification);
    }

    fn redraw_node(&mut self, id: &NodeId) {
        let Some(node) = self.graph.node(id) else {
            return;
        };
        let shape = NodeShape::from_node(node, &self.settings);
        let edges = edge_shapes(&self.graph, &self.settings, |e| {
            &e.source == id || &e.target == id
        });
        self.target.node_moved(&shape, &edges);
    }

    fn update_guide(&mut self) {
        let GestureState::Connecting { source, pointer } = &self.gesture else {
            return;
        };
        let guide = self.graph.node(source).map(|node| {
            EdgePath::new(
                output_handle(node.position, &self.settings),
                *pointer,
                self.settings.curve_offset,
            )
        });
        self.target.set_guide(guide);
    }
}
