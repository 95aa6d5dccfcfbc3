//! Error handling for mlcanvas
//!
//! This module defines the crate-level error type and a Result alias.
//! Subsystems keep their own narrower error enums (`GraphError`, `ApiError`,
//! `SimulationError`, `ImportError`, `ExportError`) which convert into [`CanvasError`].

use thiserror::Error;

use crate::api::ApiError;
use crate::export::ExportError;
use crate::graph::{GraphError, ImportError};
use crate::simulator::SimulationError;

/// Main error type for mlcanvas operations
#[derive(Error, Debug)]
pub enum CanvasError {
    /// A graph mutation was rejected
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Pasted or loaded pipeline JSON was malformed
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// The backend API call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An export could not be produced
    #[error(transparent)]
    Export(#[from] ExportError),

    /// A simulation run aborted
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to session/history storage
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CanvasError>,
    },
}

impl CanvasError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CanvasError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// True when the failure means the user has to sign in again.
    pub fn is_auth_required(&self) -> bool {
        match self {
            CanvasError::Api(e) => e.is_auth_required(),
            CanvasError::WithContext { source, .. } => source.is_auth_required(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for CanvasError {
    fn from(err: serde_json::Error) -> Self {
        CanvasError::Serialization(err.to_string())
    }
}

/// Result type alias for mlcanvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<CanvasError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context() {
        let err = CanvasError::Config("bad value".to_string());
        let with_ctx = err.with_context("Loading settings");
        assert!(with_ctx.to_string().contains("Loading settings"));
        assert!(with_ctx.to_string().contains("bad value"));
    }

    #[test]
    fn test_result_ext() {
        let result: std::result::Result<(), CanvasError> =
            Err(CanvasError::Storage("disk full".to_string()));
        let with_ctx = result.context("Persisting history");
        assert!(with_ctx.is_err());
        assert!(with_ctx
            .unwrap_err()
            .to_string()
            .contains("Persisting history"));
    }

    #[test]
    fn test_auth_required_through_context() {
        let err = CanvasError::from(ApiError::AuthRequired).with_context("Saving model");
        assert!(err.is_auth_required());
        assert!(!CanvasError::Config("x".into()).is_auth_required());
    }
}
