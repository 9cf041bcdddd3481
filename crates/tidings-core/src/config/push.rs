//! Push message configuration.

use serde::{Deserialize, Serialize};

/// Push message conversion and rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Value of the `service` field stamped on converted push payloads.
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Body text used when a rendered push message carries no message.
    #[serde(default = "default_missing_message_text")]
    pub missing_message_text: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            missing_message_text: default_missing_message_text(),
        }
    }
}

fn default_service_name() -> String {
    "GCM".to_string()
}

fn default_missing_message_text() -> String {
    "<missing message content>".to_string()
}
