//! # tidings-service
//!
//! Orchestration layer for Tidings. Each service ties the lifecycle store,
//! the event bridge and the audio manager together to implement one use
//! case: lifecycle commands, trigger handling, user-interaction callbacks
//! and push routing.
//!
//! Services follow constructor injection; all collaborators are provided
//! at construction time via `Arc` references.

pub mod builder;
pub mod command;
pub mod notification;
pub mod push;
pub mod render;
pub mod trigger;

pub use builder::{CallbackRegistry, NotificationBuilder};
pub use command::{Command, CommandDispatcher, CommandResponse, ItemFailure};
pub use notification::NotificationService;
pub use push::{PushHandler, PushInteraction, PushRoute};
pub use render::{LoggingRenderer, NotificationRenderer};
pub use trigger::{TokioTriggerScheduler, TriggerScheduler};
