//! Seam to the alarm primitive that fires scheduled notifications.

pub mod timer;

use chrono::{DateTime, Utc};

use tidings_core::result::AppResult;
use tidings_core::types::NotificationId;

pub use timer::TokioTriggerScheduler;

/// Arms and disarms wall-clock triggers.
///
/// Implementations report fired ids back to the notification service,
/// which calls its own `trigger`.
pub trait TriggerScheduler: Send + Sync + std::fmt::Debug + 'static {
    /// Fire `id` at `at`; a time in the past fires immediately. Re-arming
    /// replaces the previous timer.
    fn arm(&self, id: NotificationId, at: DateTime<Utc>) -> AppResult<()>;

    /// Cancel the timer for `id`, if any.
    fn disarm(&self, id: NotificationId);
}
