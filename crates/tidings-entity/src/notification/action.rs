//! Notification action buttons.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One action button declared on a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Identifier reported back when the action is chosen.
    pub identifier: String,
    /// Button label.
    pub title: String,
}

impl ActionSpec {
    /// Parse an `actions` array, skipping entries without an identifier.
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        let Some(items) = value.as_array() else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| {
                let identifier = item.get("identifier")?.as_str()?.to_string();
                let title = item
                    .get("title")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| identifier.clone());
                Some(Self { identifier, title })
            })
            .collect()
    }
}
