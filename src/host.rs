//! Line protocol between the host process and its embedder.
//!
//! Each stdin line is one JSON [`HostInput`]; each stdout line is one JSON
//! [`HostOutput`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tidings_core::error::{AppError, ErrorKind};
use tidings_core::events::EventEnvelope;
use tidings_core::types::RequestCode;
use tidings_entity::push::PushMessage;
use tidings_service::{Command, CommandDispatcher, CommandResponse, NotificationService};

/// Host UI lifecycle hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleHook {
    /// UI went to the background.
    Pause,
    /// UI came back to the foreground.
    Resume,
    /// UI was torn down.
    Destroy,
}

/// One input line.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HostInput {
    /// A script-runtime command.
    Command {
        /// The command itself.
        command: Command,
    },
    /// A raw message from the push transport.
    Push {
        /// String map as received.
        data: PushMessage,
    },
    /// The user interacted with a rendered notification.
    Callback {
        /// Request code of the binding that fired.
        #[serde(rename = "requestCode")]
        request_code: RequestCode,
    },
    /// Host UI lifecycle change.
    Lifecycle {
        /// Which hook fired.
        hook: LifecycleHook,
    },
    /// Device idle or power-save mode changed.
    DeviceIdle {
        /// Device idle mode.
        idle: bool,
        /// Power-save mode.
        #[serde(rename = "powerSave")]
        power_save: bool,
    },
}

/// One output line.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostOutput {
    /// A delivered lifecycle event.
    Event {
        /// The envelope as fired.
        envelope: EventEnvelope,
    },
    /// Result of a command.
    Response {
        /// Command name.
        command: &'static str,
        /// Command result.
        result: CommandResponse,
    },
    /// An input line that could not be handled.
    Error {
        /// Error category.
        kind: ErrorKind,
        /// Human-readable reason.
        message: String,
    },
}

impl From<AppError> for HostOutput {
    fn from(err: AppError) -> Self {
        Self::Error {
            kind: err.kind,
            message: err.message,
        }
    }
}

/// Applies input lines to the notification service.
#[derive(Debug, Clone)]
pub struct Host {
    service: Arc<NotificationService>,
    dispatcher: CommandDispatcher,
}

impl Host {
    /// Create a host around a wired service.
    pub fn new(service: Arc<NotificationService>) -> Self {
        let dispatcher = CommandDispatcher::new(Arc::clone(&service));
        Self {
            service,
            dispatcher,
        }
    }

    /// Handle one input line. Returns the line to print, if any.
    pub async fn handle_line(&self, line: &str) -> Option<HostOutput> {
        let input: HostInput = match serde_json::from_str(line) {
            Ok(input) => input,
            Err(e) => return Some(AppError::validation(format!("Invalid input: {e}")).into()),
        };

        match input {
            HostInput::Command { command } => {
                let name = command.name();
                let result = self.dispatcher.execute(command).await;
                Some(HostOutput::Response {
                    command: name,
                    result,
                })
            }
            HostInput::Push { data } => {
                let route = self.service.push().on_message(data).await;
                debug!(route = ?route, "Push message handled");
                None
            }
            HostInput::Callback { request_code } => self
                .service
                .on_callback(request_code)
                .await
                .err()
                .map(HostOutput::from),
            HostInput::Lifecycle { hook } => {
                match hook {
                    LifecycleHook::Pause => self.service.on_pause(),
                    LifecycleHook::Resume => {
                        self.service.on_resume();
                    }
                    LifecycleHook::Destroy => self.service.on_destroy(),
                }
                None
            }
            HostInput::DeviceIdle { idle, power_save } => {
                self.service.on_device_idle_changed(idle, power_save);
                None
            }
        }
    }
}
