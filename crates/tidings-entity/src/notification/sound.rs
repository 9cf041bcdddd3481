//! Audio attachment of a notification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sound to play while a notification is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundSpec {
    /// Asset reference resolved by the asset source.
    pub file: String,
    /// Volume as a percentage of the stream maximum (0–100).
    pub volume: u8,
    /// Whether playback loops until stopped.
    #[serde(rename = "loop")]
    pub looping: bool,
}

impl SoundSpec {
    /// Parse a sound spec.
    ///
    /// A bare string names the asset with full volume and no looping; an
    /// object may set `file`, `volume` (default 100) and `loop` (default false).
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(file) if !file.trim().is_empty() => Some(Self {
                file: file.trim().to_string(),
                volume: 100,
                looping: false,
            }),
            Value::Object(map) => {
                let file = map.get("file")?.as_str()?.trim();
                if file.is_empty() {
                    return None;
                }
                let volume = map
                    .get("volume")
                    .and_then(Value::as_u64)
                    .unwrap_or(100)
                    .min(100) as u8;
                let looping = map.get("loop").and_then(Value::as_bool).unwrap_or(false);
                Some(Self {
                    file: file.to_string(),
                    volume,
                    looping,
                })
            }
            _ => None,
        }
    }
}
