//! Configuration module for mlcanvas
//!
//! This module handles application configuration including:
//! - `config.toml` with API, history, canvas and simulation settings
//! - The session store used for crash recovery and the history tail
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.mlcanvas.mlcanvas/`
//! - **macOS**: `~/Library/Application Support/dev.mlcanvas.mlcanvas/`
//! - **Windows**: `%APPDATA%\dev.mlcanvas.mlcanvas\`
//!
//! # Files
//!
//! - `config.toml` - User settings
//! - `session/*.json` - One file per session store key

pub mod settings;
pub mod store;

pub use settings::*;
pub use store::{read_json, write_json, FileStore, MemoryStore, SessionStore};
#[cfg(test)]
pub use store::MockSessionStore;

use crate::error::{CanvasError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.mlcanvas.mlcanvas";

/// Settings filename
pub const CONFIG_FILE: &str = "config.toml";

/// Directory holding session store files
pub const SESSION_DIR: &str = "session";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        CanvasError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            CanvasError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the settings file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

/// Directory for the file-backed session store
pub fn session_dir() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(SESSION_DIR))
}

// ==================== AppConfig ====================

/// All user-tunable settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub history: HistorySettings,
    pub canvas: CanvasSettings,
    pub simulation: SimulationSettings,
}

impl AppConfig {
    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CanvasError::Config(format!("Failed to parse settings: {}", e)))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CanvasError::Config(format!("Failed to serialize settings: {}", e)))
    }

    /// Load settings from a file; a missing file yields defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {:?}", path))?;
        Self::from_toml(&content)
    }

    /// Load settings from the default location, returning defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save settings to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CanvasError::Config(format!("Failed to create settings directory: {}", e))
            })?;
        }

        std::fs::write(path, self.to_toml()?)
            .map_err(|e| CanvasError::Config(format!("Failed to write settings {:?}: {}", path, e)))?;

        tracing::debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Save settings to the default location
    pub fn save_default(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save(dir.join(CONFIG_FILE))
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [history]
            max_size = 20

            [simulation]
            node_delay_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.history.max_size, 20);
        assert_eq!(config.history.persisted_tail, 10);
        assert_eq!(config.simulation.node_delay_ms, 0);
        assert_eq!(config.canvas, CanvasSettings::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[history\nmax_size = ").unwrap_err();
        assert!(matches!(err, CanvasError::Config(_)));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.api.base_url = "https://ml.example.org".to_string();
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
