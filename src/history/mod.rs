//! Undo/redo history of graph snapshots.
//!
//! The top of the undo stack always mirrors the current graph, so undo moves
//! that entry to the redo stack and hands back the one below it. The first
//! entry recorded (normally `INIT`) can therefore never be undone.

mod action;

pub use action::HistoryAction;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::config::{read_json, write_json, HistorySettings, SessionStore};
use crate::graph::GraphSnapshot;

/// Session store key of the persisted history tail.
pub const HISTORY_KEY: &str = "canvas_history";

/// A recorded graph state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub state: GraphSnapshot,
    pub action: HistoryAction,
    #[serde(default)]
    pub metadata: Value,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Undo/redo availability and tooltips for the toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_tooltip: String,
    pub redo_tooltip: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStats {
    pub undo_available: usize,
    pub redo_available: usize,
    pub total_actions: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Debug view of one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySummary {
    pub action: HistoryAction,
    pub timestamp: String,
    pub metadata: Value,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedHistory {
    #[serde(default)]
    undo_stack: Vec<HistoryEntry>,
    #[serde(default)]
    redo_stack: Vec<HistoryEntry>,
}

struct BufferedAction {
    action: HistoryAction,
}

/// Bounded undo/redo stacks with optional persistence.
pub struct HistoryManager {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_size: usize,
    persisted_tail: usize,
    enabled: bool,
    batch: Option<Vec<BufferedAction>>,
    store: Option<Arc<dyn SessionStore>>,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(&HistorySettings::default())
    }
}

impl std::fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .field("enabled", &self.enabled)
            .field("batching", &self.batch.is_some())
            .finish()
    }
}

impl HistoryManager {
    pub fn new(settings: &HistorySettings) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_size: settings.max_size.max(1),
            persisted_tail: settings.persisted_tail,
            enabled: true,
            batch: None,
            store: None,
        }
    }

    /// Persist the stack tails to `store` after every change.
    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Record the graph state produced by `action`.
    pub fn record_state(&mut self, state: &GraphSnapshot, action: HistoryAction, metadata: Value) {
        if !self.enabled {
            return;
        }

        if let Some(buffer) = self.batch.as_mut() {
            buffer.push(BufferedAction { action });
            return;
        }

        tracing::debug!(action = action.tag(), nodes = state.nodes.len(), "Recording history");

        self.undo_stack.push_back(HistoryEntry {
            state: state.clone(),
            action,
            metadata,
            timestamp: chrono::Utc::now().timestamp_millis(),
        });
        self.redo_stack.clear();

        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }

        self.persist();
    }

    /// Step back one entry, returning the state to restore.
    pub fn undo(&mut self) -> Option<GraphSnapshot> {
        if self.undo_stack.len() <= 1 {
            return None;
        }

        let current = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        let previous = self.undo_stack.back().map(|e| e.state.clone());

        self.persist();
        previous
    }

    /// Re-apply the most recently undone entry.
    pub fn redo(&mut self) -> Option<GraphSnapshot> {
        let next = self.redo_stack.pop()?;
        let state = next.state.clone();
        self.undo_stack.push_back(next);

        self.persist();
        Some(state)
    }

    /// Buffer subsequent records until [`end_batch`](Self::end_batch).
    pub fn start_batch(&mut self) {
        self.batch = Some(Vec::new());
    }

    /// Collapse the buffered records into one entry holding `final_state`.
    ///
    /// Nothing is recorded if no action was buffered.
    pub fn end_batch(&mut self, final_state: &GraphSnapshot, label: Option<HistoryAction>) {
        let Some(buffer) = self.batch.take() else {
            return;
        };
        if buffer.is_empty() {
            return;
        }

        let actions: Vec<&str> = buffer.iter().map(|b| b.action.tag()).collect();
        let metadata = json!({ "actions": actions, "count": buffer.len() });
        self.record_state(
            final_state,
            label.unwrap_or(HistoryAction::BatchOperation),
            metadata,
        );
    }

    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }

    /// Stop recording without touching the stacks.
    pub fn pause(&mut self) {
        self.enabled = false;
    }

    pub fn resume(&mut self) {
        self.enabled = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.persist();
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Action of the entry that mirrors the current state.
    pub fn last_action(&self) -> Option<&HistoryAction> {
        self.undo_stack.back().map(|e| &e.action)
    }

    /// State of the entry that mirrors the current graph.
    pub fn top_state(&self) -> Option<&GraphSnapshot> {
        self.undo_stack.back().map(|e| &e.state)
    }

    /// Action that redo would re-apply.
    pub fn next_action(&self) -> Option<&HistoryAction> {
        self.redo_stack.last().map(|e| &e.action)
    }

    pub fn undo_tooltip(&self) -> String {
        match self.last_action() {
            Some(action) if self.can_undo() => format!("Undo: {}", action.label()),
            _ => "Nothing to undo".to_string(),
        }
    }

    pub fn redo_tooltip(&self) -> String {
        match self.next_action() {
            Some(action) => format!("Redo: {}", action.label()),
            None => "Nothing to redo".to_string(),
        }
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            undo_tooltip: self.undo_tooltip(),
            redo_tooltip: self.redo_tooltip(),
        }
    }

    pub fn stats(&self) -> HistoryStats {
        let undo = self.undo_stack.len();
        let redo = self.redo_stack.len();
        HistoryStats {
            undo_available: undo.saturating_sub(1),
            redo_available: redo,
            total_actions: (undo + redo).saturating_sub(1),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Undo and redo entries, oldest first, for the debug panel.
    pub fn entries(&self) -> (Vec<EntrySummary>, Vec<EntrySummary>) {
        fn summarize(entry: &HistoryEntry) -> EntrySummary {
            let timestamp = chrono::DateTime::from_timestamp_millis(entry.timestamp)
                .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
                .unwrap_or_default();
            EntrySummary {
                action: entry.action.clone(),
                timestamp,
                metadata: entry.metadata.clone(),
            }
        }
        (
            self.undo_stack.iter().map(summarize).collect(),
            self.redo_stack.iter().map(summarize).collect(),
        )
    }

    /// Reload stacks from the persisted tail. Returns false when nothing usable
    /// was stored.
    pub fn restore(&mut self) -> bool {
        let Some(store) = self.store.as_ref() else {
            return false;
        };
        match read_json::<PersistedHistory>(store.as_ref(), HISTORY_KEY) {
            Ok(Some(saved)) => {
                self.undo_stack = saved.undo_stack.into();
                self.redo_stack = saved.redo_stack;
                tracing::info!(
                    undo = self.undo_stack.len(),
                    redo = self.redo_stack.len(),
                    "Restored history"
                );
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Failed to restore history: {}", e);
                false
            }
        }
    }

    fn persist(&self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let tail = |len: usize| len.saturating_sub(self.persisted_tail);
        let data = PersistedHistory {
            undo_stack: self
                .undo_stack
                .iter()
                .skip(tail(self.undo_stack.len()))
                .cloned()
                .collect(),
            redo_stack: self.redo_stack[tail(self.redo_stack.len())..].to_vec(),
        };
        if let Err(e) = write_json(store.as_ref(), HISTORY_KEY, &data) {
            tracing::warn!("Failed to persist history: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MemoryStore, MockSessionStore};
    use crate::error::CanvasError;
    use crate::graph::{Node, NodeData, NodeId, Position};

    fn snapshot(n: usize) -> GraphSnapshot {
        GraphSnapshot {
            nodes: (1..=n)
                .map(|i| Node {
                    id: NodeId::from_counter(i as u64),
                    node_type: "data".into(),
                    position: Position::default(),
                    data: NodeData::default(),
                })
                .collect(),
            edges: vec![],
        }
    }

    fn manager() -> HistoryManager {
        HistoryManager::default()
    }

    #[test]
    fn test_init_then_one_action() {
        let mut history = manager();
        let s0 = snapshot(0);
        let s1 = snapshot(1);

        history.record_state(&s0, HistoryAction::Init, Value::Null);
        assert!(!history.can_undo());

        history.record_state(&s1, HistoryAction::AddNode, Value::Null);
        assert!(history.can_undo());

        assert_eq!(history.undo(), Some(s0));
        assert!(!history.can_undo());
        assert!(history.can_redo());

        assert_eq!(history.redo(), Some(s1));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_never_passes_init() {
        let mut history = manager();
        history.record_state(&snapshot(0), HistoryAction::Init, Value::Null);
        assert_eq!(history.undo(), None);
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = manager();
        for i in 0..60 {
            history.record_state(&snapshot(i), HistoryAction::AddNode, json!({ "i": i }));
        }
        assert_eq!(history.undo_len(), 50);

        let (undo, _) = history.entries();
        assert_eq!(undo[0].metadata["i"], 10);
        assert_eq!(undo[49].metadata["i"], 59);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = manager();
        history.record_state(&snapshot(0), HistoryAction::Init, Value::Null);
        history.record_state(&snapshot(1), HistoryAction::AddNode, Value::Null);
        history.undo();
        assert!(history.can_redo());

        history.record_state(&snapshot(2), HistoryAction::AddNode, Value::Null);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_paused_records_nothing() {
        let mut history = manager();
        history.pause();
        history.record_state(&snapshot(0), HistoryAction::Init, Value::Null);
        assert_eq!(history.undo_len(), 0);
        history.resume();
        history.record_state(&snapshot(0), HistoryAction::Init, Value::Null);
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_batch_collapses_to_one_entry() {
        let mut history = manager();
        history.record_state(&snapshot(0), HistoryAction::Init, Value::Null);

        history.start_batch();
        history.record_state(&snapshot(1), HistoryAction::AddNode, Value::Null);
        history.record_state(&snapshot(2), HistoryAction::AddNode, Value::Null);
        history.record_state(&snapshot(2), HistoryAction::AddEdge, Value::Null);
        assert_eq!(history.undo_len(), 1);

        let final_state = snapshot(2);
        history.end_batch(&final_state, None);

        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.last_action(), Some(&HistoryAction::BatchOperation));
        let (undo, _) = history.entries();
        assert_eq!(undo[1].metadata["count"], 3);
        assert_eq!(
            undo[1].metadata["actions"],
            json!(["ADD_NODE", "ADD_NODE", "ADD_EDGE"])
        );
    }

    #[test]
    fn test_empty_batch_records_nothing() {
        let mut history = manager();
        history.start_batch();
        history.end_batch(&snapshot(3), Some(HistoryAction::LoadTemplate));
        assert_eq!(history.undo_len(), 0);
        assert!(!history.is_batching());
    }

    #[test]
    fn test_tooltips_and_stats() {
        let mut history = manager();
        assert_eq!(history.undo_tooltip(), "Nothing to undo");
        assert_eq!(history.redo_tooltip(), "Nothing to redo");

        history.record_state(&snapshot(0), HistoryAction::Init, Value::Null);
        assert_eq!(history.undo_tooltip(), "Nothing to undo");

        history.record_state(&snapshot(1), HistoryAction::AddNode, Value::Null);
        assert_eq!(history.undo_tooltip(), "Undo: Add Component");

        history.undo();
        assert_eq!(history.redo_tooltip(), "Redo: Add Component");

        let stats = history.stats();
        assert_eq!(stats.undo_available, 0);
        assert_eq!(stats.redo_available, 1);
        assert_eq!(stats.total_actions, 1);
    }

    #[test]
    fn test_persists_tail_and_restores() {
        let store = Arc::new(MemoryStore::new());
        let mut history = manager().with_store(store.clone());
        for i in 0..15 {
            history.record_state(&snapshot(i), HistoryAction::AddNode, json!(i));
        }
        history.undo();

        let mut restored = manager().with_store(store);
        assert!(restored.restore());
        assert_eq!(restored.undo_len(), 10);
        assert_eq!(restored.redo_len(), 1);
        assert_eq!(restored.redo(), Some(snapshot(14)));
    }

    #[test]
    fn test_storage_failure_is_swallowed() {
        let mut store = MockSessionStore::new();
        store
            .expect_set()
            .returning(|_, _| Err(CanvasError::Storage("quota exceeded".into())));

        let mut history = manager().with_store(Arc::new(store));
        history.record_state(&snapshot(0), HistoryAction::Init, Value::Null);
        history.record_state(&snapshot(1), HistoryAction::AddNode, Value::Null);

        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.undo(), Some(snapshot(0)));
    }
}
