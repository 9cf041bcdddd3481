//! Audio playback configuration.

use serde::{Deserialize, Serialize};

/// Notification sound playback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Directory sound assets are resolved against.
    #[serde(default = "default_asset_dir")]
    pub asset_dir: String,
    /// Directory where decoded assets are staged during playback.
    /// Empty means `<system temp>/tidings`.
    #[serde(default)]
    pub staging_dir: String,
    /// Upper bound of the notification volume stream.
    #[serde(default = "default_max_volume")]
    pub max_volume: u32,
    /// Ambient volume level at startup.
    #[serde(default = "default_initial_volume")]
    pub initial_volume: u32,
}

impl AudioConfig {
    /// Resolved staging directory.
    pub fn staging_path(&self) -> std::path::PathBuf {
        if self.staging_dir.is_empty() {
            std::env::temp_dir().join("tidings")
        } else {
            std::path::PathBuf::from(&self.staging_dir)
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            asset_dir: default_asset_dir(),
            staging_dir: String::new(),
            max_volume: default_max_volume(),
            initial_volume: default_initial_volume(),
        }
    }
}

fn default_asset_dir() -> String {
    "./assets".to_string()
}

fn default_max_volume() -> u32 {
    15
}

fn default_initial_volume() -> u32 {
    7
}
