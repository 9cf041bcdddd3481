//! Notification lifecycle entities.

pub mod action;
pub mod options;
pub mod record;
pub mod scope;
pub mod sound;
pub mod state;

pub use action::ActionSpec;
pub use options::NotificationOptions;
pub use record::NotificationRecord;
pub use scope::Scope;
pub use sound::SoundSpec;
pub use state::NotificationState;
