//! Caller-owned notification options.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use tidings_core::error::AppError;
use tidings_core::types::NotificationId;

use super::action::ActionSpec;
use super::sound::SoundSpec;

/// Opaque key-value payload describing one notification.
///
/// The schema belongs to the caller. Only the handful of fields the
/// lifecycle needs (`id`, `at`, `sound`, `actions`, display fields) are
/// read through typed accessors; everything else round-trips untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationOptions(Map<String, Value>);

impl NotificationOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build options from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AppError::validation(format!(
                "Notification options must be an object, got {other}"
            ))),
        }
    }

    /// Identifier carried in the options, if any.
    ///
    /// Accepts both numbers and numeric strings.
    pub fn id(&self) -> Option<NotificationId> {
        match self.0.get("id")? {
            Value::Number(n) => n
                .as_i64()
                .and_then(|raw| i32::try_from(raw).ok())
                .map(NotificationId),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Stamp the identifier into the options.
    pub fn with_id(mut self, id: NotificationId) -> Self {
        self.0.insert("id".to_string(), Value::from(id.get()));
        self
    }

    /// Notification title, empty when absent.
    pub fn title(&self) -> &str {
        self.str_field("title")
    }

    /// Notification body text, empty when absent.
    pub fn text(&self) -> &str {
        self.str_field("text")
    }

    /// Badge number shown next to the notification.
    pub fn badge(&self) -> Option<i64> {
        self.0.get("badge").and_then(Value::as_i64)
    }

    /// Trigger time from the `at` field (epoch seconds).
    pub fn trigger_at(&self) -> Option<DateTime<Utc>> {
        let secs = match self.0.get("at")? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };
        Utc.timestamp_opt(secs, 0).single()
    }

    /// Audio attachment, if the notification carries one.
    pub fn sound(&self) -> Option<SoundSpec> {
        self.0.get("sound").and_then(SoundSpec::from_value)
    }

    /// Declared actions, in declaration order.
    pub fn actions(&self) -> Vec<ActionSpec> {
        self.0
            .get("actions")
            .map(ActionSpec::list_from_value)
            .unwrap_or_default()
    }

    /// Whether activating the notification also clears it. Defaults to `true`.
    pub fn auto_clear(&self) -> bool {
        self.0
            .get("autoClear")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    /// Whether the notification is ongoing (not user-dismissable).
    pub fn ongoing(&self) -> bool {
        self.0
            .get("ongoing")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// LED color override.
    pub fn led(&self) -> Option<&str> {
        self.0.get("led").and_then(Value::as_str)
    }

    /// Merge the fields of `update` into these options.
    ///
    /// Supplied fields overwrite existing ones, absent fields are kept, and
    /// the identifier never changes.
    pub fn merge(&mut self, update: &NotificationOptions) {
        for (key, value) in &update.0 {
            if key == "id" {
                continue;
            }
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a raw field.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Serialize into a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    fn str_field(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }
}
