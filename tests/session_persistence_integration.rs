//! Session recovery through the file store, view transforms and local export.

mod common;

use std::sync::Arc;

use common::{assert_float_eq, library, messages, session};
use mlcanvas::canvas::{CanvasSession, Point, SceneBuffer, Viewport, SESSION_KEY};
use mlcanvas::config::{read_json, FileStore, SessionStore};
use mlcanvas::export::write_files;
use mlcanvas::{AppConfig, ComponentLibrary};
use tempfile::TempDir;

fn stored_session(store: Arc<dyn SessionStore>) -> CanvasSession<SceneBuffer> {
    let mut session = CanvasSession::new(SceneBuffer::new(), library(), &AppConfig::default())
        .with_store(store);
    session.set_viewport(Viewport::new(1000.0, 800.0));
    session
}

#[test]
fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("session"));

    assert_eq!(store.get("missing").unwrap(), None);
    store.set("key", "{\"a\":1}").unwrap();
    assert_eq!(store.get("key").unwrap().as_deref(), Some("{\"a\":1}"));

    store.remove("key").unwrap();
    assert_eq!(store.get("key").unwrap(), None);
}

#[test]
fn test_session_restored_in_new_editor() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn SessionStore> = Arc::new(FileStore::new(dir.path()));
    let components = ComponentLibrary::builtin();

    let mut first = stored_session(Arc::clone(&store));
    first.initialize();
    let a = first.add_node(components.get("csv-loader").unwrap(), 0.0, 0.0);
    let b = first.add_node(components.get("standard-scaler").unwrap(), 300.0, 0.0);
    first.connect(&a.id, &b.id).unwrap();
    let saved = first.graph().snapshot();

    let state: Option<mlcanvas::canvas::CanvasSessionState> =
        read_json(store.as_ref(), SESSION_KEY).unwrap();
    assert_eq!(state.map(|s| s.next_node_id), Some(3));

    let mut second = stored_session(Arc::clone(&store));
    assert!(second.restore_session());
    assert_eq!(second.graph().snapshot(), saved);
    assert!(second.history().can_undo());

    // Counters carry over, so ids are not reissued.
    let c = second.add_node(components.get("pca").unwrap(), 600.0, 0.0);
    assert_eq!(c.id.as_str(), "node-3");

    second.undo();
    assert_eq!(second.graph().snapshot(), saved);
}

#[test]
fn test_restore_without_saved_state() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn SessionStore> = Arc::new(FileStore::new(dir.path()));

    let mut session = stored_session(store);
    assert!(!session.restore_session());
    assert!(session.graph().is_empty());
}

#[test]
fn test_fit_view_on_empty_graph_is_noop() {
    let mut session = session();
    session.zoom_in();
    let before = session.transform();

    session.fit_view();
    assert_eq!(session.transform(), before);
}

#[test]
fn test_fit_view_centres_single_node() {
    let mut session = session();
    let components = ComponentLibrary::builtin();
    session.add_node(components.get("pca").unwrap(), 0.0, 0.0);

    session.fit_view();
    let transform = session.transform();
    assert_float_eq(transform.scale, 1.0, 1e-9);
    assert_float_eq(transform.x, 400.0, 1e-9);
    assert_float_eq(transform.y, 360.0, 1e-9);
}

#[test]
fn test_wheel_zoom_is_clamped() {
    let mut session = session();
    for _ in 0..40 {
        session.wheel(Point::new(500.0, 400.0), -1.0);
    }
    assert_float_eq(session.transform().scale, 2.0, 1e-9);
    assert_eq!(session.zoom_label(), "200%");

    for _ in 0..60 {
        session.wheel(Point::new(500.0, 400.0), 1.0);
    }
    assert_float_eq(session.transform().scale, 0.1, 1e-9);
}

#[test]
fn test_wheel_zoom_keeps_anchor_fixed() {
    let mut session = session();
    let anchor = Point::new(250.0, 100.0);
    let before = session.transform().screen_to_canvas(anchor);

    session.wheel(anchor, -1.0);

    let after = session.transform().screen_to_canvas(anchor);
    assert_float_eq(before.x, after.x, 1e-9);
    assert_float_eq(before.y, after.y, 1e-9);
}

#[test]
fn test_export_json_writes_file() {
    let mut session = session();
    session.load_template("iris-classification");
    let file = session.export_json().expect("non-empty pipeline exports");

    let parsed: serde_json::Value = serde_json::from_str(&file.contents).unwrap();
    assert_eq!(parsed["nodes"].as_array().map(Vec::len), Some(4));
    assert!(parsed["exportedAt"].is_string());

    let dir = TempDir::new().unwrap();
    let written = write_files(dir.path(), &[file]).unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].exists());
}

#[test]
fn test_export_json_of_empty_pipeline_fails() {
    let mut session = session();
    messages(&mut session);

    assert!(session.export_json().is_none());
    assert_eq!(messages(&mut session).len(), 1);
}
