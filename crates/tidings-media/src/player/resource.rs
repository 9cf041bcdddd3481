//! One live playback and the state it must put back on release.

use std::path::{Path, PathBuf};

use tracing::debug;

use tidings_core::types::NotificationId;

use crate::assets::AssetStager;
use crate::traits::{PlaybackHandle, VolumeControl};

/// Playback owned by a single notification.
#[derive(Debug)]
pub struct PlaybackResource {
    notification_id: NotificationId,
    /// Ambient level captured before the override.
    saved_volume: u32,
    /// Staged copy the output reads from.
    temp_asset_path: PathBuf,
    handle: Box<dyn PlaybackHandle>,
}

impl PlaybackResource {
    /// Wrap a started playback.
    pub fn new(
        notification_id: NotificationId,
        saved_volume: u32,
        temp_asset_path: PathBuf,
        handle: Box<dyn PlaybackHandle>,
    ) -> Self {
        Self {
            notification_id,
            saved_volume,
            temp_asset_path,
            handle,
        }
    }

    /// Owning notification.
    pub fn notification_id(&self) -> NotificationId {
        self.notification_id
    }

    /// Level restored on release.
    pub fn saved_volume(&self) -> u32 {
        self.saved_volume
    }

    /// Staged asset path.
    pub fn temp_asset_path(&self) -> &Path {
        &self.temp_asset_path
    }

    /// Stop playback, restore the saved volume and delete the staged asset.
    ///
    /// Consumes the resource so the restore happens exactly once.
    pub async fn release(mut self, volume: &dyn VolumeControl, stager: &AssetStager) {
        self.handle.stop();
        volume.set(self.saved_volume);
        stager.discard(&self.temp_asset_path).await;
        debug!(
            id = %self.notification_id,
            restored = self.saved_volume,
            "Playback resource released"
        );
    }
}
