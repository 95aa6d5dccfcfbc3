//! Undo/redo behaviour of the history manager and the canvas session.

mod common;

use common::builders::classification_chain;
use common::{messages, session};
use mlcanvas::config::HistorySettings;
use mlcanvas::history::HistoryAction;
use mlcanvas::{ComponentLibrary, HistoryManager};
use serde_json::json;

#[test]
fn test_fresh_session_has_only_init() {
    let session = session();
    let history = session.history();

    assert_eq!(history.undo_len(), 1);
    assert_eq!(history.last_action(), Some(&HistoryAction::Init));
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert_eq!(history.undo_tooltip(), "Nothing to undo");
    assert_eq!(history.redo_tooltip(), "Nothing to redo");
}

#[test]
fn test_undo_redo_add_node() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    session.add_node(library.get("csv-loader").unwrap(), 10.0, 10.0);

    assert_eq!(session.history().undo_tooltip(), "Undo: Add Component");
    messages(&mut session);

    assert!(session.undo());
    assert!(session.graph().is_empty());
    assert!(session.selected().is_none());
    assert_eq!(messages(&mut session), vec!["Undo: Add Component"]);
    assert_eq!(session.history().redo_tooltip(), "Redo: Add Component");

    assert!(session.redo());
    assert_eq!(session.graph().nodes().len(), 1);
    assert_eq!(messages(&mut session), vec!["Redo: Add Component"]);

    // undo/redo themselves never add entries
    assert_eq!(session.history().undo_len(), 2);
    assert_eq!(session.history().redo_len(), 0);
}

#[test]
fn test_undo_with_single_entry_reports_nothing() {
    let mut session = session();
    assert!(!session.undo());
    assert_eq!(messages(&mut session), vec!["Nothing to undo"]);
    assert!(!session.redo());
    assert_eq!(messages(&mut session), vec!["Nothing to redo"]);
}

#[test]
fn test_undo_delete_restores_incident_edges() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let a = session.add_node(library.get("csv-loader").unwrap(), 0.0, 0.0);
    let b = session.add_node(library.get("standard-scaler").unwrap(), 300.0, 0.0);
    session.connect(&a.id, &b.id).unwrap();

    session.delete_node(&a.id);
    assert!(session.graph().edges().is_empty());

    session.undo();
    assert_eq!(session.graph().nodes().len(), 2);
    assert_eq!(session.graph().edges().len(), 1);
}

#[test]
fn test_new_record_clears_redo() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let pca = library.get("pca").unwrap();
    session.add_node(pca, 0.0, 0.0);
    session.undo();
    assert!(session.history().can_redo());

    session.add_node(pca, 50.0, 50.0);
    assert!(!session.history().can_redo());
}

#[test]
fn test_capacity_evicts_oldest() {
    let mut history = HistoryManager::new(&HistorySettings::default());
    let graph = classification_chain();
    let snapshot = graph.snapshot();

    history.record_state(&snapshot, HistoryAction::Init, json!({}));
    for _ in 0..59 {
        history.record_state(&snapshot, HistoryAction::AddNode, json!({}));
    }

    assert_eq!(history.undo_len(), 50);
    let (undo, _) = history.entries();
    assert!(undo.iter().all(|e| e.action == HistoryAction::AddNode));
}

#[test]
fn test_paused_history_ignores_records() {
    let mut history = HistoryManager::default();
    let snapshot = classification_chain().snapshot();
    history.record_state(&snapshot, HistoryAction::Init, json!({}));

    history.pause();
    history.record_state(&snapshot, HistoryAction::AddNode, json!({}));
    assert_eq!(history.undo_len(), 1);

    history.resume();
    history.record_state(&snapshot, HistoryAction::AddNode, json!({}));
    assert_eq!(history.undo_len(), 2);
}

#[test]
fn test_batch_collapses_into_one_entry() {
    let mut history = HistoryManager::default();
    let snapshot = classification_chain().snapshot();
    history.record_state(&snapshot, HistoryAction::Init, json!({}));

    history.start_batch();
    history.record_state(&snapshot, HistoryAction::AddNode, json!({}));
    history.record_state(&snapshot, HistoryAction::AddEdge, json!({}));
    history.end_batch(&snapshot, None);

    assert_eq!(history.undo_len(), 2);
    assert_eq!(history.last_action(), Some(&HistoryAction::BatchOperation));
    let (undo, _) = history.entries();
    assert_eq!(undo[1].metadata["count"], json!(2));
    assert_eq!(undo[1].metadata["actions"], json!(["ADD_NODE", "ADD_EDGE"]));

    history.start_batch();
    history.end_batch(&snapshot, None);
    assert_eq!(history.undo_len(), 2);
}

#[test]
fn test_template_load_is_a_single_undoable_step() {
    let mut session = session();
    session.load_template("iris-classification");

    assert_eq!(session.history().undo_len(), 2);
    assert_eq!(
        session.history().last_action(),
        Some(&HistoryAction::LoadTemplate)
    );

    session.undo();
    assert!(session.graph().is_empty());
}

#[test]
fn test_stats_exclude_initial_state() {
    let mut session = session();
    let library = ComponentLibrary::builtin();
    let pca = library.get("pca").unwrap();
    session.add_node(pca, 0.0, 0.0);
    session.add_node(pca, 300.0, 0.0);
    session.undo();

    let stats = session.history().stats();
    assert_eq!(stats.undo_available, 1);
    assert_eq!(stats.redo_available, 1);
    assert_eq!(stats.total_actions, 2);
}
