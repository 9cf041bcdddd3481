//! Lifecycle event vocabulary shared by the bridge and its consumers.
//!
//! Events are fired by the notification service, buffered by the event
//! bridge while the consumer is not ready, and handed over one
//! [`EventEnvelope`] at a time once it is.

pub mod envelope;
pub mod name;

pub use envelope::{AppState, EventEnvelope};
pub use name::EventName;
