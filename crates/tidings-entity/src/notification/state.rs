//! Notification lifecycle state.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a notification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationState {
    /// Waiting for its trigger time.
    Scheduled,
    /// Fired and currently presented.
    Triggered,
    /// Dismissed after triggering; kept for history.
    Cleared,
    /// Canceled; only exists long enough to report the cancel event.
    Canceled,
}

impl NotificationState {
    /// Return the state as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Triggered => "triggered",
            Self::Cleared => "cleared",
            Self::Canceled => "canceled",
        }
    }

    /// Scheduled or triggered records are active; they block re-scheduling.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Triggered)
    }
}

impl std::fmt::Display for NotificationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
