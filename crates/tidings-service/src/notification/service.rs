//! Notification lifecycle orchestration.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use serde_json::{Value, json};
use tokio::sync::{Mutex, OwnedMutexGuard, mpsc};
use tracing::{debug, info, warn};

use tidings_core::error::AppError;
use tidings_core::events::EventName;
use tidings_core::result::AppResult;
use tidings_core::traits::EventSink;
use tidings_core::types::{NotificationId, RequestCode};
use tidings_entity::descriptor::{CallbackKind, CallbackTarget, Origin};
use tidings_entity::notification::{
    NotificationOptions, NotificationRecord, NotificationState, Scope,
};
use tidings_media::AudioResourceManager;
use tidings_realtime::metrics::BridgeMetricsSnapshot;
use tidings_realtime::{AppStateTracker, EventBridge};
use tidings_store::LifecycleStore;

use crate::builder::{CallbackRegistry, NotificationBuilder};
use crate::push::{PushHandler, PushInteraction};
use crate::render::NotificationRenderer;
use crate::trigger::TriggerScheduler;

/// Ties the lifecycle store, event bridge, audio manager and platform
/// collaborators together.
///
/// Every mutation commits in the store first, then performs side effects
/// (timers, rendering, audio) and finally fires the matching event, so a
/// delivered event always describes committed state.
///
/// Trigger, update, cancel, clear and click hold a per-id lock from the
/// store commit until their event is fired. A cancel racing a trigger
/// therefore releases the audio the trigger acquired, and its event is
/// delivered after `trigger`.
#[derive(Debug)]
pub struct NotificationService {
    store: Arc<LifecycleStore>,
    bridge: Arc<EventBridge>,
    audio: Arc<AudioResourceManager>,
    builder: NotificationBuilder,
    registry: Arc<CallbackRegistry>,
    renderer: Arc<dyn NotificationRenderer>,
    scheduler: Arc<dyn TriggerScheduler>,
    app_state: Arc<AppStateTracker>,
    push: PushHandler,
    id_locks: DashMap<NotificationId, Arc<Mutex<()>>>,
}

impl NotificationService {
    /// Creates a new notification service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<LifecycleStore>,
        bridge: Arc<EventBridge>,
        audio: Arc<AudioResourceManager>,
        builder: NotificationBuilder,
        registry: Arc<CallbackRegistry>,
        renderer: Arc<dyn NotificationRenderer>,
        scheduler: Arc<dyn TriggerScheduler>,
        app_state: Arc<AppStateTracker>,
        push: PushHandler,
    ) -> Self {
        Self {
            store,
            bridge,
            audio,
            builder,
            registry,
            renderer,
            scheduler,
            app_state,
            push,
            id_locks: DashMap::new(),
        }
    }

    /// Push routing shares the service's collaborators.
    pub fn push(&self) -> &PushHandler {
        &self.push
    }

    async fn lock_id(&self, id: NotificationId) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(self.id_locks.entry(id).or_default().value());
        lock.lock_owned().await
    }

    /// Release the per-id lock and drop it once nobody else waits on it.
    fn unlock_id(&self, id: NotificationId, guard: OwnedMutexGuard<()>) {
        drop(guard);
        self.id_locks
            .remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
    }

    fn emit(&self, event: EventName, record: Option<Value>) {
        // Delivery failures are logged by the bridge and never retried.
        let _ = self.bridge.fire(event, record);
    }

    fn arm(&self, record: &NotificationRecord) {
        let at = record.options.trigger_at().unwrap_or_else(Utc::now);
        if let Err(e) = self.scheduler.arm(record.id, at) {
            warn!(id = %record.id, error = %e, "Failed to arm trigger");
        }
    }

    /// Remove everything a notification holds outside the store.
    async fn release(&self, id: NotificationId) {
        self.renderer.dismiss(Origin::Local, id);
        self.registry.drop_for(Origin::Local, id);
        self.audio.stop(id).await;
    }

    // ── Lifecycle commands ──

    /// Schedules a notification and arms its trigger.
    pub async fn schedule(&self, options: NotificationOptions) -> AppResult<NotificationRecord> {
        let record = self.store.schedule_new(options).await?;
        self.arm(&record);

        info!(id = %record.id, "Notification scheduled");
        self.emit(EventName::Schedule, Some(record.snapshot()));
        Ok(record)
    }

    /// Merges new options into an existing notification.
    ///
    /// A still-scheduled notification is re-armed with its (possibly new)
    /// trigger time.
    pub async fn update(&self, options: NotificationOptions) -> AppResult<NotificationRecord> {
        let id = options
            .id()
            .ok_or_else(|| AppError::validation("Update requires an id"))?;
        let guard = self.lock_id(id).await;
        let result = self.update_locked(id, &options).await;
        self.unlock_id(id, guard);
        result
    }

    async fn update_locked(
        &self,
        id: NotificationId,
        options: &NotificationOptions,
    ) -> AppResult<NotificationRecord> {
        let record = self.store.update(id, options).await?;
        if record.state == NotificationState::Scheduled {
            self.arm(&record);
        }

        info!(id = %id, "Notification updated");
        self.emit(EventName::Update, Some(record.snapshot()));
        Ok(record)
    }

    /// Fires a scheduled notification: renders it, starts its sound and
    /// emits `trigger`.
    ///
    /// A sound that cannot be played is logged; the notification still
    /// triggers.
    pub async fn trigger(&self, id: NotificationId) -> AppResult<NotificationRecord> {
        let guard = self.lock_id(id).await;
        let result = self.trigger_locked(id).await;
        self.unlock_id(id, guard);
        result
    }

    async fn trigger_locked(&self, id: NotificationId) -> AppResult<NotificationRecord> {
        let record = self.store.trigger(id).await?;
        let descriptor = self
            .builder
            .build(id, &record.options, || self.registry.allocate());

        self.registry.register(&descriptor);
        if let Err(e) = self.renderer.show(&descriptor) {
            warn!(id = %id, error = %e, "Failed to render notification");
        }

        if let Some(sound) = &descriptor.sound {
            if let Err(e) = self
                .audio
                .play(id, &sound.file, sound.volume, sound.looping)
                .await
            {
                warn!(id = %id, error = %e, "Notification sound unavailable");
            }
        }

        info!(id = %id, "Notification triggered");
        self.emit(EventName::Trigger, Some(record.snapshot()));
        Ok(record)
    }

    /// Cancels a notification. Unknown ids are a silent no-op.
    pub async fn cancel(&self, id: NotificationId) -> Option<NotificationRecord> {
        let guard = self.lock_id(id).await;
        let record = self.cancel_locked(id).await;
        self.unlock_id(id, guard);
        record
    }

    async fn cancel_locked(&self, id: NotificationId) -> Option<NotificationRecord> {
        let record = self.store.cancel(id).await?;
        self.scheduler.disarm(id);
        self.release(id).await;

        info!(id = %id, "Notification canceled");
        self.emit(EventName::Cancel, Some(record.snapshot()));
        Some(record)
    }

    /// Cancels every active notification and fires one `cancelall`.
    pub async fn cancel_all(&self) -> usize {
        let canceled = self.store.cancel_all().await;
        for record in &canceled {
            let guard = self.lock_id(record.id).await;
            self.scheduler.disarm(record.id);
            self.release(record.id).await;
            self.unlock_id(record.id, guard);
        }

        info!(count = canceled.len(), "All notifications canceled");
        self.emit(EventName::CancelAll, None);
        canceled.len()
    }

    /// Clears a triggered notification. No-op unless it is triggered.
    pub async fn clear(&self, id: NotificationId) -> Option<NotificationRecord> {
        let guard = self.lock_id(id).await;
        let record = self.clear_locked(id).await;
        self.unlock_id(id, guard);
        record
    }

    async fn clear_locked(&self, id: NotificationId) -> Option<NotificationRecord> {
        let record = self.store.clear(id).await?;
        self.release(id).await;

        info!(id = %id, "Notification cleared");
        self.emit(EventName::Clear, Some(record.snapshot()));
        Some(record)
    }

    /// Clears every triggered notification and fires one `clearall`.
    pub async fn clear_all(&self) -> usize {
        let cleared = self.store.clear_all().await;
        for record in &cleared {
            let guard = self.lock_id(record.id).await;
            self.release(record.id).await;
            self.unlock_id(record.id, guard);
        }

        info!(count = cleared.len(), "All notifications cleared");
        self.emit(EventName::ClearAll, None);
        cleared.len()
    }

    // ── Queries ──

    /// Whether `id` exists within `scope`.
    pub async fn exists(&self, id: NotificationId, scope: Scope) -> bool {
        self.store.exists(id, scope).await
    }

    /// Identifiers within `scope`.
    pub async fn ids(&self, scope: Scope) -> Vec<NotificationId> {
        self.store.ids_by_scope(scope).await
    }

    /// Options of one notification within `scope`, if present.
    pub async fn single(&self, id: NotificationId, scope: Scope) -> Option<Value> {
        self.store
            .records_by_ids_and_scope(&[id], scope)
            .await
            .first()
            .map(NotificationRecord::snapshot)
    }

    /// Options of the requested notifications, or of every notification in
    /// `scope` when `ids` is empty.
    pub async fn options(&self, ids: &[NotificationId], scope: Scope) -> Vec<Value> {
        let records = if ids.is_empty() {
            self.store.records_by_scope(scope).await
        } else {
            self.store.records_by_ids_and_scope(ids, scope).await
        };
        records.iter().map(NotificationRecord::snapshot).collect()
    }

    // ── Triggers and user interaction ──

    /// Trigger every id reported by the scheduling primitive until the
    /// channel closes.
    pub async fn run_triggers(&self, mut fired: mpsc::UnboundedReceiver<NotificationId>) {
        while let Some(id) = fired.recv().await {
            if let Err(e) = self.trigger(id).await {
                warn!(id = %id, error = %e, "Scheduled trigger rejected");
            }
        }
        debug!("Trigger channel closed");
    }

    /// Resolve a user interaction reported by the host.
    pub async fn on_callback(&self, code: RequestCode) -> AppResult<()> {
        let binding = self.registry.resolve(code).ok_or_else(|| {
            AppError::not_found(format!("No pending callback for request code {code}"))
        })?;

        match binding.target {
            CallbackTarget::Push { id, message } => {
                let interaction = match binding.kind {
                    CallbackKind::Delete => PushInteraction::Deleted,
                    CallbackKind::Click => PushInteraction::Opened,
                    CallbackKind::Action { identifier, .. } => PushInteraction::Action(identifier),
                };
                self.push.on_interaction(id, message, interaction).await;
                Ok(())
            }
            CallbackTarget::Local { id } => match binding.kind {
                CallbackKind::Delete => {
                    self.clear(id).await;
                    Ok(())
                }
                CallbackKind::Click => self.on_click(id, None).await,
                CallbackKind::Action { identifier, .. } => {
                    self.on_click(id, Some(identifier)).await
                }
            },
        }
    }

    async fn on_click(&self, id: NotificationId, action: Option<String>) -> AppResult<()> {
        let guard = self.lock_id(id).await;
        let result = self.on_click_locked(id, action).await;
        self.unlock_id(id, guard);
        result
    }

    async fn on_click_locked(&self, id: NotificationId, action: Option<String>) -> AppResult<()> {
        let record = self
            .store
            .get(id)
            .await
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;

        self.app_state.set_foreground();

        let mut snapshot = record.snapshot();
        if let (Some(identifier), Value::Object(map)) = (&action, &mut snapshot) {
            map.insert("actionIdentifier".to_string(), Value::from(identifier.as_str()));
        }

        info!(id = %id, action = ?action, "Notification clicked");
        self.emit(EventName::Click, Some(snapshot));

        if record.options.auto_clear() {
            self.clear_locked(id).await;
        }
        Ok(())
    }

    // ── Host lifecycle ──

    /// The host UI went to the background.
    pub fn on_pause(&self) {
        self.app_state.set_background();
    }

    /// The host UI came back; the consumer is reachable again.
    pub fn on_resume(&self) -> usize {
        self.app_state.set_foreground();
        self.bridge.mark_ready()
    }

    /// The host UI was torn down; events are buffered from now on.
    pub fn on_destroy(&self) {
        self.app_state.set_background();
        self.bridge.mark_not_ready();
    }

    /// The consumer finished initialising. Returns the number of flushed
    /// events.
    pub fn device_ready(&self) -> usize {
        self.app_state.set_foreground();
        self.bridge.mark_ready()
    }

    /// Attach a new consumer, e.g. after the host recreated its runtime.
    pub fn attach_consumer(&self, sink: Arc<dyn EventSink>) {
        self.bridge.attach(sink);
    }

    /// The device entered or left idle or power-save mode.
    pub fn on_device_idle_changed(&self, idle: bool, power_save: bool) {
        debug!(idle, power_save, "Device idle state changed");
        self.emit(
            EventName::DeviceIdleChanged,
            Some(json!({ "idle": idle, "powerSave": power_save })),
        );
    }

    /// Event bridge counters.
    pub fn bridge_metrics(&self) -> BridgeMetricsSnapshot {
        self.bridge.metrics()
    }
}
