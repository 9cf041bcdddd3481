//! Event name tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a lifecycle event as seen by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    /// A notification was scheduled.
    #[serde(rename = "schedule")]
    Schedule,
    /// A notification's content was updated.
    #[serde(rename = "update")]
    Update,
    /// A scheduled notification fired.
    #[serde(rename = "trigger")]
    Trigger,
    /// The user activated a notification or one of its actions.
    #[serde(rename = "click")]
    Click,
    /// A notification was canceled.
    #[serde(rename = "cancel")]
    Cancel,
    /// All notifications were canceled.
    #[serde(rename = "cancelall")]
    CancelAll,
    /// A triggered notification was cleared.
    #[serde(rename = "clear")]
    Clear,
    /// All triggered notifications were cleared.
    #[serde(rename = "clearall")]
    ClearAll,
    /// A push message arrived or a push notification was interacted with.
    #[serde(rename = "pushReceived")]
    PushReceived,
    /// Device idle or power-save mode changed.
    #[serde(rename = "deviceIdleChanged")]
    DeviceIdleChanged,
}

impl EventName {
    /// Wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schedule => "schedule",
            Self::Update => "update",
            Self::Trigger => "trigger",
            Self::Click => "click",
            Self::Cancel => "cancel",
            Self::CancelAll => "cancelall",
            Self::Clear => "clear",
            Self::ClearAll => "clearall",
            Self::PushReceived => "pushReceived",
            Self::DeviceIdleChanged => "deviceIdleChanged",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
