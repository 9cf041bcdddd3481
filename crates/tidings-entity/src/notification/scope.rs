//! Query scopes over lifecycle state.

use serde::{Deserialize, Serialize};

use super::state::NotificationState;

/// Filter over lifecycle state used by existence and listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Every retained record.
    Any,
    /// Records waiting for their trigger.
    Scheduled,
    /// Records that fired and were not cleared.
    Triggered,
}

impl Scope {
    /// Whether a record in `state` falls inside this scope.
    pub fn matches(&self, state: NotificationState) -> bool {
        match self {
            Self::Any => state != NotificationState::Canceled,
            Self::Scheduled => state == NotificationState::Scheduled,
            Self::Triggered => state == NotificationState::Triggered,
        }
    }
}
