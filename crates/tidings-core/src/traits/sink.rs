//! Delivery channel between the event bridge and the script runtime.

use crate::events::EventEnvelope;
use crate::result::AppResult;

/// Receives envelopes from the event bridge once the consumer is ready.
///
/// `deliver` is called inside the bridge's ordering critical section and
/// must not block. Ownership of the envelope passes to the sink; a failed
/// delivery is reported as `DeliveryUnavailable` and never retried.
pub trait EventSink: Send + Sync + std::fmt::Debug + 'static {
    /// Hand one envelope to the consumer.
    fn deliver(&self, envelope: EventEnvelope) -> AppResult<()>;
}
