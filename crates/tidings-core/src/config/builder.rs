//! Notification builder configuration.

use serde::{Deserialize, Serialize};

/// Display resources resolved once at startup and handed to the builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// Small icon resource name used for every notification.
    #[serde(default = "default_small_icon")]
    pub small_icon: String,
    /// Icon resource name attached to action buttons.
    #[serde(default = "default_action_icon")]
    pub action_icon: String,
    /// Default LED color (RGB hex) when the options do not set one.
    #[serde(default = "default_led_color")]
    pub led_color: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            small_icon: default_small_icon(),
            action_icon: default_action_icon(),
            led_color: default_led_color(),
        }
    }
}

fn default_small_icon() -> String {
    "icontransparent".to_string()
}

fn default_action_icon() -> String {
    "action_hand".to_string()
}

fn default_led_color() -> String {
    "FFFFFF".to_string()
}
