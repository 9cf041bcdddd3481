//! # tidings-entity
//!
//! Domain entities for Tidings: notification records and their lifecycle
//! states, caller-owned option payloads, the descriptor handed to the
//! rendering collaborator, and raw push messages.

pub mod descriptor;
pub mod notification;
pub mod push;

pub use descriptor::{CallbackBinding, CallbackKind, CallbackTarget, NotificationDescriptor, Origin};
pub use notification::{
    ActionSpec, NotificationOptions, NotificationRecord, NotificationState, Scope, SoundSpec,
};
pub use push::PushMessage;
