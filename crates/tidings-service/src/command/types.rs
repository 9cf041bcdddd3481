//! Command and response shapes.
//!
//! Commands arrive as `{"action": "<name>", "args": <payload>}`; the
//! `action` names match the script-side API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tidings_core::error::{AppError, ErrorKind};
use tidings_core::types::NotificationId;
use tidings_entity::notification::NotificationOptions;

/// One command from the script runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "args", rename_all = "camelCase")]
pub enum Command {
    /// Schedule each option object.
    Schedule(Vec<NotificationOptions>),
    /// Merge each option object (which must carry `id`) into its record.
    Update(Vec<NotificationOptions>),
    /// Cancel each id.
    Cancel(Vec<NotificationId>),
    /// Cancel every active notification.
    CancelAll,
    /// Clear each id.
    Clear(Vec<NotificationId>),
    /// Clear every triggered notification.
    ClearAll,
    /// Whether the id exists in any state.
    #[serde(alias = "exist")]
    IsPresent(NotificationId),
    /// Whether the id is scheduled.
    IsScheduled(NotificationId),
    /// Whether the id is triggered.
    IsTriggered(NotificationId),
    /// Every id.
    GetAllIds,
    /// Scheduled ids.
    GetScheduledIds,
    /// Triggered ids.
    GetTriggeredIds,
    /// Options of one notification.
    GetSingle(NotificationId),
    /// Options of one scheduled notification.
    GetSingleScheduled(NotificationId),
    /// Options of one triggered notification.
    GetSingleTriggered(NotificationId),
    /// Options of the listed notifications; an empty list means all.
    GetAll(Vec<NotificationId>),
    /// Options of the listed scheduled notifications; empty means all.
    GetScheduled(Vec<NotificationId>),
    /// Options of the listed triggered notifications; empty means all.
    GetTriggered(Vec<NotificationId>),
    /// The consumer is initialised and ready for events.
    #[serde(rename = "deviceready", alias = "deviceReady")]
    DeviceReady,
}

impl Command {
    /// Wire name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Schedule(_) => "schedule",
            Self::Update(_) => "update",
            Self::Cancel(_) => "cancel",
            Self::CancelAll => "cancelAll",
            Self::Clear(_) => "clear",
            Self::ClearAll => "clearAll",
            Self::IsPresent(_) => "isPresent",
            Self::IsScheduled(_) => "isScheduled",
            Self::IsTriggered(_) => "isTriggered",
            Self::GetAllIds => "getAllIds",
            Self::GetScheduledIds => "getScheduledIds",
            Self::GetTriggeredIds => "getTriggeredIds",
            Self::GetSingle(_) => "getSingle",
            Self::GetSingleScheduled(_) => "getSingleScheduled",
            Self::GetSingleTriggered(_) => "getSingleTriggered",
            Self::GetAll(_) => "getAll",
            Self::GetScheduled(_) => "getScheduled",
            Self::GetTriggered(_) => "getTriggered",
            Self::DeviceReady => "deviceready",
        }
    }
}

/// Failure of one item inside a batch command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFailure {
    /// Position of the item in the batch.
    pub index: usize,
    /// Notification id, when the item carried one.
    pub id: Option<NotificationId>,
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable reason.
    pub message: String,
}

impl ItemFailure {
    /// Record the failure of item `index`.
    pub fn new(index: usize, id: Option<NotificationId>, error: &AppError) -> Self {
        Self {
            index,
            id,
            kind: error.kind,
            message: error.message.clone(),
        }
    }
}

/// Result of one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CommandResponse {
    /// Fire-and-forget command completed; lists per-item failures.
    Done {
        /// Items that failed; the rest were applied.
        failures: Vec<ItemFailure>,
    },
    /// Boolean query result.
    Bool(bool),
    /// Identifier list.
    Ids(Vec<NotificationId>),
    /// Single option object, `null` when absent.
    Single(Option<Value>),
    /// Option object list.
    Many(Vec<Value>),
}

impl CommandResponse {
    /// Completed without failures.
    pub fn done() -> Self {
        Self::Done {
            failures: Vec::new(),
        }
    }
}
