//! Event bridge configuration.

use serde::{Deserialize, Serialize};

/// Settings for the buffering event bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Whether the host starts out in the background until the consumer resumes it.
    #[serde(default = "default_true")]
    pub start_in_background: bool,
    /// Buffered envelope count past which a warning is logged on every new event.
    #[serde(default = "default_backlog_warning")]
    pub backlog_warning: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            start_in_background: true,
            backlog_warning: default_backlog_warning(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_backlog_warning() -> usize {
    1000
}
