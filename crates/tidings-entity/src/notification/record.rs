//! Notification lifecycle record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tidings_core::types::NotificationId;

use super::options::NotificationOptions;
use super::state::NotificationState;

/// Authoritative representation of one notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Unique identifier within the store.
    pub id: NotificationId,
    /// Current lifecycle state.
    pub state: NotificationState,
    /// Caller-owned options, always carrying `id`.
    pub options: NotificationOptions,
    /// When the record was scheduled.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Create a freshly scheduled record.
    pub fn scheduled(id: NotificationId, options: NotificationOptions) -> Self {
        let now = Utc::now();
        Self {
            id,
            state: NotificationState::Scheduled,
            options: options.with_id(id),
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to a new state, bumping the update time.
    pub fn transition(&mut self, state: NotificationState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    /// Immutable JSON snapshot handed to event consumers.
    pub fn snapshot(&self) -> serde_json::Value {
        self.options.to_value()
    }
}
