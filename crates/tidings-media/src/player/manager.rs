//! Audio resource manager.
//!
//! Each notification id owns one slot guarded by its own async mutex, so
//! `play` and `stop` on the same id serialize while different ids proceed
//! independently. The ambient volume is a single shared stream: every
//! acquisition saves it once and every release restores it once, but two
//! ids overlapping in time can still observe each other's override.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

use tidings_core::error::{AppError, ErrorKind};
use tidings_core::result::AppResult;
use tidings_core::types::NotificationId;

use crate::assets::AssetStager;
use crate::player::resource::PlaybackResource;
use crate::traits::{AssetSource, AudioOutput, VolumeControl};

type Slot = Arc<Mutex<Option<PlaybackResource>>>;

/// Owns at most one playback resource per notification id.
///
/// Slots are keyed by the bare id, so a local and a push notification
/// sharing an id share one slot.
#[derive(Debug)]
pub struct AudioResourceManager {
    assets: Arc<dyn AssetSource>,
    stager: AssetStager,
    volume: Arc<dyn VolumeControl>,
    output: Arc<dyn AudioOutput>,
    slots: DashMap<NotificationId, Slot>,
}

impl AudioResourceManager {
    /// Create a manager over the given collaborators.
    pub fn new(
        assets: Arc<dyn AssetSource>,
        stager: AssetStager,
        volume: Arc<dyn VolumeControl>,
        output: Arc<dyn AudioOutput>,
    ) -> Self {
        Self {
            assets,
            stager,
            volume,
            output,
            slots: DashMap::new(),
        }
    }

    fn slot(&self, id: NotificationId) -> Slot {
        Arc::clone(self.slots.entry(id).or_default().value())
    }

    fn existing_slot(&self, id: NotificationId) -> Option<Slot> {
        self.slots.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop an empty slot nobody else is holding.
    fn prune(&self, id: NotificationId) {
        self.slots.remove_if(&id, |_, slot| {
            Arc::strong_count(slot) == 1 && slot.try_lock().is_ok_and(|guard| guard.is_none())
        });
    }

    /// Start playing `asset_ref` for notification `id`.
    ///
    /// The asset is staged before anything else changes, so a staging
    /// failure leaves an existing playback for `id` untouched. Otherwise the
    /// prior playback is released (restoring its saved volume) before the
    /// new override is applied.
    pub async fn play(
        &self,
        id: NotificationId,
        asset_ref: &str,
        volume_percent: u8,
        looping: bool,
    ) -> AppResult<()> {
        let slot = self.slot(id);
        let result = {
            let mut current = slot.lock().await;
            self.play_locked(id, &mut current, asset_ref, volume_percent, looping)
                .await
        };
        drop(slot);
        if result.is_err() {
            self.prune(id);
        }
        result
    }

    async fn play_locked(
        &self,
        id: NotificationId,
        current: &mut Option<PlaybackResource>,
        asset_ref: &str,
        volume_percent: u8,
        looping: bool,
    ) -> AppResult<()> {
        let staged = self.stage(asset_ref).await?;

        if let Some(prior) = current.take() {
            prior.release(self.volume.as_ref(), &self.stager).await;
        }

        let saved_volume = self.volume.current();
        let target = self.volume.max() * u32::from(volume_percent.min(100)) / 100;
        self.volume.set(target);

        match self.output.start(&staged, looping) {
            Ok(handle) => {
                info!(
                    id = %id,
                    asset = asset_ref,
                    saved_volume,
                    volume = target,
                    looping,
                    "Playback acquired"
                );
                *current = Some(PlaybackResource::new(id, saved_volume, staged, handle));
                Ok(())
            }
            Err(e) => {
                self.volume.set(saved_volume);
                self.stager.discard(&staged).await;
                warn!(id = %id, asset = asset_ref, error = %e, "Audio output failed to start");
                Err(AppError::with_source(
                    ErrorKind::ResourceUnavailable,
                    format!("Failed to start playback for notification {id}"),
                    e,
                ))
            }
        }
    }

    async fn stage(&self, asset_ref: &str) -> AppResult<PathBuf> {
        let data = self.assets.open(asset_ref).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ResourceUnavailable,
                format!("Failed to open asset {asset_ref}"),
                e,
            )
        })?;
        self.stager.stage(&data).await
    }

    /// Release the playback for `id`. No-op if there is none.
    pub async fn stop(&self, id: NotificationId) {
        let Some(slot) = self.existing_slot(id) else {
            return;
        };

        {
            let mut current = slot.lock().await;
            if let Some(resource) = current.take() {
                resource.release(self.volume.as_ref(), &self.stager).await;
                info!(id = %id, "Playback stopped");
            }
        }

        drop(slot);
        self.prune(id);
    }

    /// Release every playback.
    pub async fn stop_all(&self) {
        let ids: Vec<NotificationId> = self.slots.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            self.stop(id).await;
        }
    }

    /// Whether `id` currently owns a playback.
    pub async fn is_playing(&self, id: NotificationId) -> bool {
        match self.existing_slot(id) {
            Some(slot) => slot.lock().await.is_some(),
            None => false,
        }
    }

    /// Number of live playbacks.
    pub async fn active_count(&self) -> usize {
        let slots: Vec<Slot> = self
            .slots
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut count = 0;
        for slot in slots {
            if slot.lock().await.is_some() {
                count += 1;
            }
        }
        count
    }
}
