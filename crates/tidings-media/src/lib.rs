//! # tidings-media
//!
//! Audio attachments for Tidings notifications. Provides:
//!
//! - Asset resolution and staging of transient playback copies
//! - The ambient volume control shared by every playback
//! - A keyed resource manager owning at most one playback per notification

pub mod assets;
pub mod output;
pub mod player;
pub mod traits;

pub use assets::{AssetStager, LocalAssetSource};
pub use output::{LoggingOutput, SharedVolume};
pub use player::AudioResourceManager;
pub use traits::{AssetSource, AudioOutput, PlaybackHandle, VolumeControl};
