//! Fully-specified notification descriptor handed to the renderer.

use serde::{Deserialize, Serialize};

use tidings_core::types::{NotificationId, RequestCode};

use crate::notification::SoundSpec;
use crate::push::PushMessage;

/// Where a rendered notification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Scheduled through the lifecycle store.
    Local,
    /// Rendered from a push message while backgrounded.
    Push,
}

/// What happens when a binding fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CallbackKind {
    /// The user dismissed the notification.
    Delete,
    /// The user activated the notification body.
    Click,
    /// The user chose one of the declared actions.
    Action {
        /// Action identifier reported to the consumer.
        identifier: String,
        /// Button label.
        title: String,
    },
}

/// Notification a binding refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "lowercase")]
pub enum CallbackTarget {
    /// A record in the lifecycle store.
    Local {
        /// Notification identifier.
        id: NotificationId,
    },
    /// A rendered push message; the payload travels with the binding.
    Push {
        /// Notification identifier (`notId`).
        id: NotificationId,
        /// Original push payload.
        message: PushMessage,
    },
}

impl CallbackTarget {
    /// Identifier of the targeted notification.
    pub fn id(&self) -> NotificationId {
        match self {
            Self::Local { id } | Self::Push { id, .. } => *id,
        }
    }

    /// Origin of the targeted notification.
    pub fn origin(&self) -> Origin {
        match self {
            Self::Local { .. } => Origin::Local,
            Self::Push { .. } => Origin::Push,
        }
    }
}

/// A pending user-interaction callback, addressed by its request code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackBinding {
    /// Unique code the host reports back when the user interacts.
    pub request_code: RequestCode,
    /// Interaction kind.
    pub kind: CallbackKind,
    /// Notification the interaction applies to.
    pub target: CallbackTarget,
}

/// Everything the rendering collaborator needs to present a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationDescriptor {
    /// Notification identifier.
    pub id: NotificationId,
    /// Local or push.
    pub origin: Origin,
    /// Title line.
    pub title: String,
    /// Body text, also used as ticker.
    pub text: String,
    /// Badge number.
    pub badge: Option<i64>,
    /// Small icon resource.
    pub small_icon: String,
    /// Icon resource used on action buttons.
    pub action_icon: String,
    /// LED color (RGB hex).
    pub led_color: String,
    /// Whether activation removes the notification.
    pub auto_clear: bool,
    /// Whether the user can dismiss it.
    pub ongoing: bool,
    /// Audio attachment.
    pub sound: Option<SoundSpec>,
    /// Fired when the user dismisses the notification.
    pub on_delete: Option<CallbackBinding>,
    /// Fired when the user activates the notification.
    pub on_click: CallbackBinding,
    /// One binding per declared action.
    pub on_action: Vec<CallbackBinding>,
}

impl NotificationDescriptor {
    /// All bindings carried by this descriptor.
    pub fn bindings(&self) -> impl Iterator<Item = &CallbackBinding> {
        self.on_delete
            .iter()
            .chain(std::iter::once(&self.on_click))
            .chain(self.on_action.iter())
    }
}
