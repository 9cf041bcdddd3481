//! Seam to the platform notification surface.

use tracing::info;

use tidings_core::result::AppResult;
use tidings_core::types::NotificationId;
use tidings_entity::descriptor::{NotificationDescriptor, Origin};

/// Presents and removes notifications on the host.
pub trait NotificationRenderer: Send + Sync + std::fmt::Debug + 'static {
    /// Show (or replace) the notification described by `descriptor`.
    fn show(&self, descriptor: &NotificationDescriptor) -> AppResult<()>;

    /// Remove a shown notification. Unknown ids are ignored.
    fn dismiss(&self, origin: Origin, id: NotificationId);
}

/// Renderer for headless hosts: every call is logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingRenderer;

impl NotificationRenderer for LoggingRenderer {
    fn show(&self, descriptor: &NotificationDescriptor) -> AppResult<()> {
        info!(
            id = %descriptor.id,
            origin = ?descriptor.origin,
            title = %descriptor.title,
            text = %descriptor.text,
            actions = descriptor.on_action.len(),
            sound = descriptor.sound.is_some(),
            "Notification shown"
        );
        Ok(())
    }

    fn dismiss(&self, origin: Origin, id: NotificationId) {
        info!(id = %id, origin = ?origin, "Notification dismissed");
    }
}
