//! Executes commands against the notification service.

use std::sync::Arc;

use tracing::{debug, warn};

use tidings_core::error::AppError;
use tidings_core::result::AppResult;
use tidings_entity::notification::{NotificationOptions, Scope};

use crate::command::types::{Command, CommandResponse, ItemFailure};
use crate::notification::NotificationService;

/// Dispatches one command at a time to the notification service.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    service: Arc<NotificationService>,
}

impl CommandDispatcher {
    /// Creates a new dispatcher.
    pub fn new(service: Arc<NotificationService>) -> Self {
        Self { service }
    }

    /// Parse and execute a JSON-encoded command.
    pub async fn execute_raw(&self, raw: &str) -> AppResult<CommandResponse> {
        let command: Command = serde_json::from_str(raw)
            .map_err(|e| AppError::validation(format!("Invalid command: {e}")))?;
        Ok(self.execute(command).await)
    }

    /// Execute a command.
    ///
    /// Batch commands process every item; one item's failure is reported in
    /// the response and does not stop the rest.
    pub async fn execute(&self, command: Command) -> CommandResponse {
        debug!(command = command.name(), "Executing command");
        let service = &self.service;

        match command {
            Command::Schedule(items) => self.schedule_batch(items).await,
            Command::Update(items) => self.update_batch(items).await,
            Command::Cancel(ids) => {
                for id in ids {
                    service.cancel(id).await;
                }
                CommandResponse::done()
            }
            Command::CancelAll => {
                service.cancel_all().await;
                CommandResponse::done()
            }
            Command::Clear(ids) => {
                for id in ids {
                    service.clear(id).await;
                }
                CommandResponse::done()
            }
            Command::ClearAll => {
                service.clear_all().await;
                CommandResponse::done()
            }
            Command::IsPresent(id) => CommandResponse::Bool(service.exists(id, Scope::Any).await),
            Command::IsScheduled(id) => {
                CommandResponse::Bool(service.exists(id, Scope::Scheduled).await)
            }
            Command::IsTriggered(id) => {
                CommandResponse::Bool(service.exists(id, Scope::Triggered).await)
            }
            Command::GetAllIds => CommandResponse::Ids(service.ids(Scope::Any).await),
            Command::GetScheduledIds => CommandResponse::Ids(service.ids(Scope::Scheduled).await),
            Command::GetTriggeredIds => CommandResponse::Ids(service.ids(Scope::Triggered).await),
            Command::GetSingle(id) => CommandResponse::Single(service.single(id, Scope::Any).await),
            Command::GetSingleScheduled(id) => {
                CommandResponse::Single(service.single(id, Scope::Scheduled).await)
            }
            Command::GetSingleTriggered(id) => {
                CommandResponse::Single(service.single(id, Scope::Triggered).await)
            }
            Command::GetAll(ids) => CommandResponse::Many(service.options(&ids, Scope::Any).await),
            Command::GetScheduled(ids) => {
                CommandResponse::Many(service.options(&ids, Scope::Scheduled).await)
            }
            Command::GetTriggered(ids) => {
                CommandResponse::Many(service.options(&ids, Scope::Triggered).await)
            }
            Command::DeviceReady => {
                service.device_ready();
                CommandResponse::done()
            }
        }
    }

    async fn schedule_batch(&self, items: Vec<NotificationOptions>) -> CommandResponse {
        let mut failures = Vec::new();
        for (index, options) in items.into_iter().enumerate() {
            let id = options.id();
            if let Err(e) = self.service.schedule(options).await {
                warn!(index, id = ?id, error = %e, "Schedule item rejected");
                failures.push(ItemFailure::new(index, id, &e));
            }
        }
        CommandResponse::Done { failures }
    }

    async fn update_batch(&self, items: Vec<NotificationOptions>) -> CommandResponse {
        let mut failures = Vec::new();
        for (index, options) in items.into_iter().enumerate() {
            let id = options.id();
            if let Err(e) = self.service.update(options).await {
                warn!(index, id = ?id, error = %e, "Update item rejected");
                failures.push(ItemFailure::new(index, id, &e));
            }
        }
        CommandResponse::Done { failures }
    }
}
