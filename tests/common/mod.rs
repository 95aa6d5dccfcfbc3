//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use std::sync::Arc;

use mlcanvas::canvas::{CanvasSession, SceneBuffer, Viewport};
use mlcanvas::{AppConfig, ComponentLibrary};

/// Shared builtin catalog
pub fn library() -> Arc<ComponentLibrary> {
    Arc::new(ComponentLibrary::builtin())
}

/// Initialised session rendering into a [`SceneBuffer`], with a 1000x800 viewport.
pub fn session() -> CanvasSession<SceneBuffer> {
    let mut session = CanvasSession::new(SceneBuffer::new(), library(), &AppConfig::default());
    session.set_viewport(Viewport::new(1000.0, 800.0));
    session.initialize();
    session
}

/// Messages of all notifications pushed so far, draining them.
pub fn messages(session: &mut CanvasSession<SceneBuffer>) -> Vec<String> {
    session
        .target_mut()
        .drain_notifications()
        .into_iter()
        .map(|n| n.message)
        .collect()
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}
