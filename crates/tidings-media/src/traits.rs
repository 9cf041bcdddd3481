//! Collaborator seams for audio playback.
//!
//! The manager never talks to a device directly; the host supplies an
//! [`AudioOutput`], a [`VolumeControl`] and an [`AssetSource`].

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;

use tidings_core::result::AppResult;

/// Process-wide notification volume stream.
pub trait VolumeControl: Send + Sync + std::fmt::Debug + 'static {
    /// Current level.
    fn current(&self) -> u32;

    /// Highest level the stream accepts.
    fn max(&self) -> u32;

    /// Set the level; values above `max` are clamped.
    fn set(&self, level: u32);
}

/// A running playback.
pub trait PlaybackHandle: Send + Sync + std::fmt::Debug {
    /// Stop the playback. Calling it on a finished playback is harmless.
    fn stop(&mut self);
}

/// Device that plays staged audio files.
pub trait AudioOutput: Send + Sync + std::fmt::Debug + 'static {
    /// Start playing the file at `path`.
    fn start(&self, path: &Path, looping: bool) -> AppResult<Box<dyn PlaybackHandle>>;
}

/// Resolves an asset reference to its bytes.
#[async_trait]
pub trait AssetSource: Send + Sync + std::fmt::Debug + 'static {
    /// Read the whole asset into memory.
    async fn open(&self, asset_ref: &str) -> AppResult<Bytes>;
}
