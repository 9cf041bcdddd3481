//! Tokio timer implementation of the trigger primitive.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use tidings_core::error::AppError;
use tidings_core::result::AppResult;
use tidings_core::types::NotificationId;

use super::TriggerScheduler;

/// One armed timer. The generation tells a fired timer whether it was
/// replaced while sleeping.
#[derive(Debug)]
struct ArmedTimer {
    generation: u64,
    cancel: CancellationToken,
}

/// Sleeps on the tokio runtime and reports fired ids on a channel.
#[derive(Debug)]
pub struct TokioTriggerScheduler {
    timers: Arc<DashMap<NotificationId, ArmedTimer>>,
    fired: mpsc::UnboundedSender<NotificationId>,
    generation: AtomicU64,
    runtime: Handle,
}

impl TokioTriggerScheduler {
    /// Create a scheduler on the current runtime.
    ///
    /// Returns the receiver the notification service drains to trigger
    /// records.
    pub fn new() -> AppResult<(Self, mpsc::UnboundedReceiver<NotificationId>)> {
        let runtime = Handle::try_current()
            .map_err(|e| AppError::internal(format!("Trigger scheduler needs a runtime: {e}")))?;
        let (fired, receiver) = mpsc::unbounded_channel();

        let scheduler = Self {
            timers: Arc::new(DashMap::new()),
            fired,
            generation: AtomicU64::new(0),
            runtime,
        };
        Ok((scheduler, receiver))
    }

    /// Whether a timer is pending for `id`.
    pub fn is_armed(&self, id: NotificationId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Number of pending timers.
    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }
}

impl TriggerScheduler for TokioTriggerScheduler {
    fn arm(&self, id: NotificationId, at: DateTime<Utc>) -> AppResult<()> {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        let delay = (at - Utc::now()).to_std().unwrap_or(Duration::ZERO);

        let replaced = self.timers.insert(
            id,
            ArmedTimer {
                generation,
                cancel: cancel.clone(),
            },
        );
        if let Some(previous) = replaced {
            previous.cancel.cancel();
        }

        let timers = Arc::clone(&self.timers);
        let fired = self.fired.clone();
        self.runtime.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(id = %id, "Trigger timer canceled");
                }
                _ = tokio::time::sleep(delay) => {
                    let current = timers.remove_if(&id, |_, timer| timer.generation == generation);
                    if current.is_some() && fired.send(id).is_err() {
                        debug!(id = %id, "Trigger receiver closed, fired id discarded");
                    }
                }
            }
        });

        debug!(id = %id, at = %at, delay_ms = delay.as_millis() as u64, "Trigger armed");
        Ok(())
    }

    fn disarm(&self, id: NotificationId) {
        if let Some((_, timer)) = self.timers.remove(&id) {
            timer.cancel.cancel();
            debug!(id = %id, "Trigger disarmed");
        }
    }
}
