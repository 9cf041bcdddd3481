//! Raw push payload and its conversion into the event payload shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use tidings_core::types::NotificationId;

use crate::notification::{ActionSpec, SoundSpec};

/// Flat string map delivered by the push transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PushMessage(BTreeMap<String, String>);

impl PushMessage {
    /// Wrap a raw string map.
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self(fields)
    }

    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Set a raw field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Title, if present and non-empty.
    pub fn title(&self) -> Option<&str> {
        self.get("title").filter(|s| !s.is_empty())
    }

    /// Message body, if present and non-empty.
    pub fn message(&self) -> Option<&str> {
        self.get("message").filter(|s| !s.is_empty())
    }

    /// Whether the message has anything to show in a notification.
    pub fn has_display_content(&self) -> bool {
        self.title().is_some() || self.message().is_some()
    }

    /// Notification identifier from `notId`, `0` when absent or malformed.
    pub fn notification_id(&self) -> NotificationId {
        self.get("notId")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(NotificationId(0))
    }

    /// Badge count from `msgcnt`.
    pub fn badge(&self) -> Option<i64> {
        self.get("msgcnt").and_then(|raw| raw.trim().parse().ok())
    }

    /// Sound attachment encoded as a JSON object in `sound`.
    pub fn sound(&self) -> Option<SoundSpec> {
        let raw = self.get("sound")?;
        let value: Value = serde_json::from_str(raw).ok()?;
        SoundSpec::from_value(&value)
    }

    /// Actions encoded as a JSON array in `actions`.
    pub fn actions(&self) -> Vec<ActionSpec> {
        self.get("actions")
            .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
            .map(|value| ActionSpec::list_from_value(&value))
            .unwrap_or_default()
    }

    /// Convert into the JSON object delivered with `pushReceived`.
    pub fn to_event_payload(&self, service_name: &str) -> Value {
        let mut json = Map::new();
        json.insert("event".to_string(), Value::from("message"));

        for (key, value) in &self.0 {
            match key.as_str() {
                "from" | "collapse_key" | "title" | "message" => {
                    json.insert(key.clone(), Value::from(value.as_str()));
                }
                "foreground" | "coldstart" | "deleted" => {
                    json.insert(key.clone(), Value::Bool(parse_flag(value)));
                }
                "action" => {
                    json.insert(
                        "actionResponseIdentifier".to_string(),
                        Value::from(value.as_str()),
                    );
                }
                "actions" | "sound" | "vibrate" => {
                    if let Some(parsed) = parse_structured(value) {
                        json.insert(key.clone(), parsed);
                    }
                }
                _ => {
                    if let Some(parsed) = parse_structured(value) {
                        json.insert("payload".to_string(), parsed);
                    }
                }
            }
        }

        json.insert("service".to_string(), Value::from(service_name));
        Value::Object(json)
    }
}

fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

/// Parse a JSON object or array; anything else is ignored.
fn parse_structured(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}
