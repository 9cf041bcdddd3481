//! Event bridge metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counters describing bridge traffic.
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    /// Events fired
    pub fired: AtomicU64,
    /// Events buffered while the consumer was not ready
    pub buffered: AtomicU64,
    /// Events delivered immediately
    pub delivered: AtomicU64,
    /// Buffered events delivered by a flush
    pub flushed: AtomicU64,
    /// Deliveries rejected by the sink
    pub failed: AtomicU64,
}

impl BridgeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a counter
    pub fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> BridgeMetricsSnapshot {
        BridgeMetricsSnapshot {
            fired: self.fired.load(Ordering::Relaxed),
            buffered: self.buffered.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            flushed: self.flushed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeMetricsSnapshot {
    /// Events fired
    pub fired: u64,
    /// Events buffered
    pub buffered: u64,
    /// Events delivered immediately
    pub delivered: u64,
    /// Events delivered by a flush
    pub flushed: u64,
    /// Failed deliveries
    pub failed: u64,
}
