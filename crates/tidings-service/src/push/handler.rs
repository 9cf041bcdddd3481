//! Push message routing and interaction with rendered push notifications.

use std::sync::Arc;

use tracing::{debug, warn};

use tidings_core::config::PushConfig;
use tidings_core::events::EventName;
use tidings_core::types::NotificationId;
use tidings_entity::descriptor::Origin;
use tidings_entity::push::PushMessage;
use tidings_media::AudioResourceManager;
use tidings_realtime::{AppStateTracker, EventBridge};

use crate::builder::{CallbackRegistry, NotificationBuilder};
use crate::render::NotificationRenderer;

/// Where an incoming push message ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushRoute {
    /// Fired to the consumer as `pushReceived`.
    Delivered,
    /// Rendered as a notification because the app was backgrounded.
    Rendered(NotificationId),
}

/// How the user interacted with a rendered push notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushInteraction {
    /// The notification body was activated.
    Opened,
    /// The notification was swiped away.
    Deleted,
    /// One of the declared actions was chosen.
    Action(String),
}

/// Routes push messages to the consumer or to the notification surface.
#[derive(Debug)]
pub struct PushHandler {
    bridge: Arc<EventBridge>,
    audio: Arc<AudioResourceManager>,
    builder: NotificationBuilder,
    registry: Arc<CallbackRegistry>,
    renderer: Arc<dyn NotificationRenderer>,
    app_state: Arc<AppStateTracker>,
    config: PushConfig,
}

impl PushHandler {
    /// Create a push handler.
    pub fn new(
        bridge: Arc<EventBridge>,
        audio: Arc<AudioResourceManager>,
        builder: NotificationBuilder,
        registry: Arc<CallbackRegistry>,
        renderer: Arc<dyn NotificationRenderer>,
        app_state: Arc<AppStateTracker>,
        config: PushConfig,
    ) -> Self {
        Self {
            bridge,
            audio,
            builder,
            registry,
            renderer,
            app_state,
            config,
        }
    }

    /// Handle a message from the push transport.
    ///
    /// Messages without title and message always go to the consumer. Others
    /// are rendered while the app is backgrounded and delivered otherwise.
    pub async fn on_message(&self, message: PushMessage) -> PushRoute {
        if !message.has_display_content() || !self.app_state.is_background() {
            debug!(
                display = message.has_display_content(),
                "Push message delivered to consumer"
            );
            self.deliver(&message);
            return PushRoute::Delivered;
        }

        let descriptor = self.builder.build_push(
            &message,
            &self.config.missing_message_text,
            || self.registry.allocate(),
        );
        let id = descriptor.id;

        if let Some(sound) = &descriptor.sound {
            if let Err(e) = self
                .audio
                .play(id, &sound.file, sound.volume, sound.looping)
                .await
            {
                warn!(id = %id, error = %e, "Push notification sound unavailable");
            }
        }

        // The new notification replaces any shown under the same id.
        let stale = self.registry.drop_for(Origin::Push, id);
        if stale > 0 {
            debug!(id = %id, stale, "Replaced bindings of previous push notification");
        }
        self.registry.register(&descriptor);
        if let Err(e) = self.renderer.show(&descriptor) {
            warn!(id = %id, error = %e, "Failed to render push notification");
        }

        debug!(id = %id, "Push message rendered while backgrounded");
        PushRoute::Rendered(id)
    }

    /// Handle a user interaction with a rendered push notification.
    ///
    /// The notification is dismissed and its audio stopped before the
    /// annotated payload is fired as `pushReceived`.
    pub async fn on_interaction(
        &self,
        id: NotificationId,
        mut message: PushMessage,
        interaction: PushInteraction,
    ) {
        self.renderer.dismiss(Origin::Push, id);
        self.audio.stop(id).await;
        self.registry.drop_for(Origin::Push, id);

        match interaction {
            PushInteraction::Deleted => message.insert("deleted", "true"),
            PushInteraction::Opened => self.app_state.set_foreground(),
            PushInteraction::Action(identifier) => {
                self.app_state.set_foreground();
                message.insert("action", identifier);
            }
        }

        debug!(id = %id, "Push notification interaction delivered");
        self.deliver(&message);
    }

    fn deliver(&self, message: &PushMessage) {
        let payload = message.to_event_payload(&self.config.service_name);
        // Delivery failures are logged by the bridge.
        let _ = self.bridge.fire(EventName::PushReceived, Some(payload));
    }
}
