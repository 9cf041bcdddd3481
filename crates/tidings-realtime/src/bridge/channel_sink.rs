//! Event sink backed by an unbounded Tokio channel.

use tokio::sync::mpsc;

use tidings_core::error::AppError;
use tidings_core::events::EventEnvelope;
use tidings_core::result::AppResult;
use tidings_core::traits::EventSink;

/// Sends envelopes to a consumer task over an mpsc channel.
///
/// The channel is unbounded so that delivery never blocks the bridge's
/// critical section. A dropped receiver surfaces as `DeliveryUnavailable`.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<EventEnvelope>,
}

impl ChannelSink {
    /// Create a sink and the receiver the consumer reads from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EventEnvelope>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Whether the consumer side has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl EventSink for ChannelSink {
    fn deliver(&self, envelope: EventEnvelope) -> AppResult<()> {
        self.sender
            .send(envelope)
            .map_err(|e| AppError::delivery_unavailable(format!("Consumer channel closed: {e}")))
    }
}
