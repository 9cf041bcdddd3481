//! Shared test helpers for integration tests.
//!
//! Builds a fully wired notification service whose host collaborators
//! (event sink, renderer, trigger scheduler, audio output) are recording
//! fakes, with sound assets served from a temporary directory.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tempfile::TempDir;

use tidings_core::config::{BuilderConfig, PushConfig};
use tidings_core::error::AppError;
use tidings_core::events::{AppState, EventEnvelope, EventName};
use tidings_core::result::AppResult;
use tidings_core::traits::EventSink;
use tidings_core::types::{NotificationId, RequestCode};
use tidings_entity::descriptor::{NotificationDescriptor, Origin};
use tidings_entity::notification::NotificationOptions;
use tidings_entity::push::PushMessage;
use tidings_media::{
    AssetStager, AudioOutput, AudioResourceManager, LocalAssetSource, PlaybackHandle,
    SharedVolume, VolumeControl,
};
use tidings_realtime::{AppStateTracker, EventBridge};
use tidings_service::{
    CallbackRegistry, CommandDispatcher, NotificationBuilder, NotificationService, PushHandler,
    TriggerScheduler,
};
use tidings_store::LifecycleStore;

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// ── Recording fakes ──

/// Event sink that keeps every delivered envelope.
#[derive(Debug, Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<EventEnvelope>>,
    failing: AtomicBool,
}

impl RecordingSink {
    /// Make every following delivery fail.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delivered envelopes, oldest first.
    pub fn envelopes(&self) -> Vec<EventEnvelope> {
        lock(&self.delivered).clone()
    }

    /// Delivered event names, oldest first.
    pub fn names(&self) -> Vec<EventName> {
        lock(&self.delivered).iter().map(|e| e.event).collect()
    }

    /// The most recent envelope.
    pub fn last(&self) -> Option<EventEnvelope> {
        lock(&self.delivered).last().cloned()
    }

    pub fn clear(&self) {
        lock(&self.delivered).clear();
    }
}

impl EventSink for RecordingSink {
    fn deliver(&self, envelope: EventEnvelope) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::delivery_unavailable("Consumer is gone"));
        }
        lock(&self.delivered).push(envelope);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ShowGate {
    armed: bool,
    entered: bool,
    open: bool,
}

/// Renderer that keeps shown descriptors and dismissals.
///
/// `hold_next_show` makes the next `show` call block its thread until
/// `release_show`, which opens a window between a trigger's store commit
/// and its side effects.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    shown: Mutex<Vec<NotificationDescriptor>>,
    dismissed: Mutex<Vec<(Origin, NotificationId)>>,
    gate: Mutex<ShowGate>,
    gate_changed: Condvar,
}

impl RecordingRenderer {
    pub fn hold_next_show(&self) {
        *lock(&self.gate) = ShowGate {
            armed: true,
            ..ShowGate::default()
        };
    }

    /// Whether a `show` call is currently blocked.
    pub fn is_holding(&self) -> bool {
        let gate = lock(&self.gate);
        gate.entered && !gate.open
    }

    pub fn release_show(&self) {
        lock(&self.gate).open = true;
        self.gate_changed.notify_all();
    }

    /// Wait until a held `show` call is blocked.
    pub async fn wait_until_holding(&self) {
        while !self.is_holding() {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    }

    fn pass_gate(&self) {
        let mut gate = lock(&self.gate);
        if !gate.armed {
            return;
        }
        gate.armed = false;
        gate.entered = true;
        while !gate.open {
            gate = self
                .gate_changed
                .wait(gate)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    pub fn shown(&self) -> Vec<NotificationDescriptor> {
        lock(&self.shown).clone()
    }

    /// The most recently shown descriptor.
    pub fn last_shown(&self) -> Option<NotificationDescriptor> {
        lock(&self.shown).last().cloned()
    }

    pub fn dismissed(&self) -> Vec<(Origin, NotificationId)> {
        lock(&self.dismissed).clone()
    }
}

impl tidings_service::NotificationRenderer for RecordingRenderer {
    fn show(&self, descriptor: &NotificationDescriptor) -> AppResult<()> {
        self.pass_gate();
        lock(&self.shown).push(descriptor.clone());
        Ok(())
    }

    fn dismiss(&self, origin: Origin, id: NotificationId) {
        lock(&self.dismissed).push((origin, id));
    }
}

/// Scheduler that only records armed trigger times; tests fire triggers
/// by calling the service directly.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    armed: Mutex<HashMap<NotificationId, DateTime<Utc>>>,
    disarmed: Mutex<Vec<NotificationId>>,
}

impl ManualScheduler {
    /// Trigger time currently armed for `id`.
    pub fn armed_at(&self, id: NotificationId) -> Option<DateTime<Utc>> {
        lock(&self.armed).get(&id).copied()
    }

    pub fn is_armed(&self, id: NotificationId) -> bool {
        lock(&self.armed).contains_key(&id)
    }

    pub fn disarmed(&self) -> Vec<NotificationId> {
        lock(&self.disarmed).clone()
    }
}

impl TriggerScheduler for ManualScheduler {
    fn arm(&self, id: NotificationId, at: DateTime<Utc>) -> AppResult<()> {
        lock(&self.armed).insert(id, at);
        Ok(())
    }

    fn disarm(&self, id: NotificationId) {
        lock(&self.armed).remove(&id);
        lock(&self.disarmed).push(id);
    }
}

/// Audio output that records started and stopped playbacks.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    started: Mutex<Vec<(PathBuf, bool)>>,
    stopped: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingOutput {
    pub fn started(&self) -> Vec<(PathBuf, bool)> {
        lock(&self.started).clone()
    }

    pub fn stopped(&self) -> Vec<PathBuf> {
        lock(&self.stopped).clone()
    }
}

#[derive(Debug)]
struct RecordedPlayback {
    path: PathBuf,
    stopped: Arc<Mutex<Vec<PathBuf>>>,
}

impl PlaybackHandle for RecordedPlayback {
    fn stop(&mut self) {
        lock(&self.stopped).push(self.path.clone());
    }
}

impl AudioOutput for RecordingOutput {
    fn start(&self, path: &Path, looping: bool) -> AppResult<Box<dyn PlaybackHandle>> {
        lock(&self.started).push((path.to_path_buf(), looping));
        Ok(Box::new(RecordedPlayback {
            path: path.to_path_buf(),
            stopped: Arc::clone(&self.stopped),
        }))
    }
}

// ── Test application ──

/// Fully wired service plus handles on every fake.
pub struct TestApp {
    pub service: Arc<NotificationService>,
    pub dispatcher: CommandDispatcher,
    pub bridge: Arc<EventBridge>,
    pub app_state: Arc<AppStateTracker>,
    pub registry: Arc<CallbackRegistry>,
    pub audio: Arc<AudioResourceManager>,
    pub sink: Arc<RecordingSink>,
    pub renderer: Arc<RecordingRenderer>,
    pub scheduler: Arc<ManualScheduler>,
    pub output: Arc<RecordingOutput>,
    pub volume: Arc<SharedVolume>,
    pub assets: TempDir,
    pub staging: TempDir,
}

impl TestApp {
    /// Create a new test application; the consumer is not ready yet and the
    /// app starts in the background.
    pub fn new() -> Self {
        let assets = tempfile::tempdir().unwrap();
        std::fs::write(assets.path().join("bell.wav"), b"RIFF-bell").unwrap();
        std::fs::write(assets.path().join("chime.wav"), b"RIFF-chime").unwrap();
        let staging = tempfile::tempdir().unwrap();

        let app_state = Arc::new(AppStateTracker::new(AppState::Background));
        let sink = Arc::new(RecordingSink::default());
        let bridge = Arc::new(EventBridge::new(
            Arc::clone(&sink) as Arc<dyn EventSink>,
            Arc::clone(&app_state),
            1000,
        ));

        let volume = Arc::new(SharedVolume::new(7, 15));
        let output = Arc::new(RecordingOutput::default());
        let audio = Arc::new(AudioResourceManager::new(
            Arc::new(LocalAssetSource::new(assets.path())),
            AssetStager::new(staging.path()),
            Arc::clone(&volume) as Arc<dyn VolumeControl>,
            Arc::clone(&output) as Arc<dyn AudioOutput>,
        ));

        let registry = Arc::new(CallbackRegistry::new());
        let renderer = Arc::new(RecordingRenderer::default());
        let scheduler = Arc::new(ManualScheduler::default());
        let builder = NotificationBuilder::new(BuilderConfig::default());

        let push = PushHandler::new(
            Arc::clone(&bridge),
            Arc::clone(&audio),
            builder.clone(),
            Arc::clone(&registry),
            Arc::clone(&renderer) as Arc<dyn tidings_service::NotificationRenderer>,
            Arc::clone(&app_state),
            PushConfig::default(),
        );
        let service = Arc::new(NotificationService::new(
            Arc::new(LifecycleStore::new()),
            Arc::clone(&bridge),
            Arc::clone(&audio),
            builder,
            Arc::clone(&registry),
            Arc::clone(&renderer) as Arc<dyn tidings_service::NotificationRenderer>,
            Arc::clone(&scheduler) as Arc<dyn TriggerScheduler>,
            Arc::clone(&app_state),
            push,
        ));
        let dispatcher = CommandDispatcher::new(Arc::clone(&service));

        Self {
            service,
            dispatcher,
            bridge,
            app_state,
            registry,
            audio,
            sink,
            renderer,
            scheduler,
            output,
            volume,
            assets,
            staging,
        }
    }

    /// Create a test application whose consumer is already ready.
    pub fn ready() -> Self {
        let app = Self::new();
        app.service.device_ready();
        app
    }

    /// Number of files left in the staging directory.
    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(self.staging.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Schedule one notification from a JSON object.
    pub async fn schedule(&self, options: Value) -> NotificationId {
        self.service
            .schedule(NotificationOptions::from_value(options).unwrap())
            .await
            .unwrap()
            .id
    }
}

/// Parse options from a JSON object.
pub fn options(value: Value) -> NotificationOptions {
    NotificationOptions::from_value(value).unwrap()
}

/// Build a push message from string pairs.
pub fn push_message(pairs: &[(&str, &str)]) -> PushMessage {
    PushMessage::new(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

/// Request code of the first binding of a descriptor matching `pred`.
pub fn code_of(
    descriptor: &NotificationDescriptor,
    pred: impl Fn(&tidings_entity::descriptor::CallbackKind) -> bool,
) -> RequestCode {
    descriptor
        .bindings()
        .find(|binding| pred(&binding.kind))
        .map(|binding| binding.request_code)
        .unwrap()
}
