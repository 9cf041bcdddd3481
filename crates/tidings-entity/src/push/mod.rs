//! Raw push messages.

pub mod message;

pub use message::PushMessage;
