//! Envelope carrying one event and the context captured when it was fired.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::name::EventName;

/// Foreground/background state of the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    /// The consumer's UI is visible.
    Foreground,
    /// The consumer's UI is hidden or not yet started.
    Background,
}

impl AppState {
    /// Wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Foreground => "foreground",
            Self::Background => "background",
        }
    }
}

/// One fired event plus the application state at fire time.
///
/// The record snapshot is serialized when the event is fired, so later
/// mutations of the notification never leak into a queued envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Position in fire order, assigned by the bridge.
    pub seq: u64,
    /// Event name.
    pub event: EventName,
    /// Notification record or push payload snapshot, if any.
    pub record: Option<serde_json::Value>,
    /// Application state when the event was fired.
    pub app_state: AppState,
    /// When the event was fired.
    pub fired_at: DateTime<Utc>,
}

impl EventEnvelope {
    /// Create a new envelope stamped with the current time.
    pub fn new(
        seq: u64,
        event: EventName,
        record: Option<serde_json::Value>,
        app_state: AppState,
    ) -> Self {
        Self {
            seq,
            event,
            record,
            app_state,
            fired_at: Utc::now(),
        }
    }
}
