//! Push message handling.

pub mod handler;

pub use handler::{PushHandler, PushInteraction, PushRoute};
