//! Bridge between lifecycle commands and the event consumer.

pub mod channel_sink;
pub mod event_bridge;

pub use channel_sink::ChannelSink;
pub use event_bridge::EventBridge;
