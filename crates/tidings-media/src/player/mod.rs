//! Keyed playback resources.

pub mod manager;
pub mod resource;

pub use manager::AudioResourceManager;
pub use resource::PlaybackResource;
