//! Tunable settings grouped by subsystem.
//!
//! Every section has serde defaults so a partial `config.toml` only needs
//! the keys it overrides.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL the `/api/...` paths are appended to
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Undo/redo history limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum undo entries kept in memory
    pub max_size: usize,

    /// Entries of each stack written to the session store
    pub persisted_tail: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_size: 50,
            persisted_tail: 10,
        }
    }
}

/// Canvas geometry and zoom behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Scale change per wheel notch
    pub wheel_zoom_step: f64,

    /// Scale change per toolbar zoom button press
    pub button_zoom_step: f64,

    pub min_scale: f64,
    pub max_scale: f64,

    /// Margin kept around the graph by fit-to-view, in screen pixels
    pub fit_padding: f64,

    pub node_width: f64,
    pub node_height: f64,

    /// Horizontal offset of edge control points
    pub curve_offset: f64,

    /// Hit radius of connection handles, in canvas units
    pub handle_radius: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            wheel_zoom_step: 0.05,
            button_zoom_step: 0.1,
            min_scale: 0.1,
            max_scale: 2.0,
            fit_padding: 50.0,
            node_width: 200.0,
            node_height: 80.0,
            curve_offset: 50.0,
            handle_radius: 8.0,
        }
    }
}

impl CanvasSettings {
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Mock simulation pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Artificial delay before each node completes
    pub node_delay_ms: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self { node_delay_ms: 600 }
    }
}

impl SimulationSettings {
    pub fn node_delay(&self) -> Duration {
        Duration::from_millis(self.node_delay_ms)
    }

    /// No delay; used by tests and batch runs.
    pub fn instant() -> Self {
        Self { node_delay_ms: 0 }
    }
}
