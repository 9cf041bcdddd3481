//! Builds renderer descriptors from notification options or push messages.

use tidings_core::config::BuilderConfig;
use tidings_core::types::{NotificationId, RequestCode};
use tidings_entity::descriptor::{
    CallbackBinding, CallbackKind, CallbackTarget, NotificationDescriptor, Origin,
};
use tidings_entity::notification::{ActionSpec, NotificationOptions};
use tidings_entity::push::PushMessage;

/// Pure transformation from options to a fully specified descriptor.
///
/// Request codes come from the caller-supplied generator so every binding
/// of one build is distinct.
#[derive(Debug, Clone)]
pub struct NotificationBuilder {
    config: BuilderConfig,
}

impl NotificationBuilder {
    /// Create a builder with display resources resolved at startup.
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Descriptor for a local notification.
    pub fn build(
        &self,
        id: NotificationId,
        options: &NotificationOptions,
        mut next_code: impl FnMut() -> RequestCode,
    ) -> NotificationDescriptor {
        let target = CallbackTarget::Local { id };

        NotificationDescriptor {
            id,
            origin: Origin::Local,
            title: options.title().to_string(),
            text: options.text().to_string(),
            badge: options.badge(),
            small_icon: self.config.small_icon.clone(),
            action_icon: self.config.action_icon.clone(),
            led_color: options
                .led()
                .unwrap_or(&self.config.led_color)
                .to_string(),
            auto_clear: options.auto_clear(),
            ongoing: options.ongoing(),
            sound: options.sound(),
            on_delete: Some(bind(&mut next_code, CallbackKind::Delete, &target)),
            on_click: bind(&mut next_code, CallbackKind::Click, &target),
            on_action: bind_actions(&mut next_code, options.actions(), &target),
        }
    }

    /// Descriptor for a push message rendered while the app is backgrounded.
    ///
    /// A delete binding is only attached when the message carries a sound,
    /// since dismissing is then the only way to stop the playback.
    pub fn build_push(
        &self,
        message: &PushMessage,
        missing_message_text: &str,
        mut next_code: impl FnMut() -> RequestCode,
    ) -> NotificationDescriptor {
        let id = message.notification_id();
        let target = CallbackTarget::Push {
            id,
            message: message.clone(),
        };
        let sound = message.sound();

        NotificationDescriptor {
            id,
            origin: Origin::Push,
            title: message.title().unwrap_or_default().to_string(),
            text: message
                .message()
                .unwrap_or(missing_message_text)
                .to_string(),
            badge: message.badge(),
            small_icon: self.config.small_icon.clone(),
            action_icon: self.config.action_icon.clone(),
            led_color: self.config.led_color.clone(),
            auto_clear: true,
            ongoing: false,
            on_delete: sound
                .as_ref()
                .map(|_| bind(&mut next_code, CallbackKind::Delete, &target)),
            sound,
            on_click: bind(&mut next_code, CallbackKind::Click, &target),
            on_action: bind_actions(&mut next_code, message.actions(), &target),
        }
    }
}

fn bind(
    next_code: &mut impl FnMut() -> RequestCode,
    kind: CallbackKind,
    target: &CallbackTarget,
) -> CallbackBinding {
    CallbackBinding {
        request_code: next_code(),
        kind,
        target: target.clone(),
    }
}

fn bind_actions(
    next_code: &mut impl FnMut() -> RequestCode,
    actions: Vec<ActionSpec>,
    target: &CallbackTarget,
) -> Vec<CallbackBinding> {
    actions
        .into_iter()
        .map(|action| {
            let kind = CallbackKind::Action {
                identifier: action.identifier,
                title: action.title,
            };
            bind(next_code, kind, target)
        })
        .collect()
}
