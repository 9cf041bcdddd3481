//! Readiness-gated event bridge.
//!
//! Every `fire` goes through one mutex, so delivery order equals fire order
//! for all callers. Before the consumer signals readiness, envelopes are
//! queued; the first `mark_ready` flushes them in order.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing::{debug, info, warn};

use tidings_core::events::{EventEnvelope, EventName};
use tidings_core::result::AppResult;
use tidings_core::traits::EventSink;

use crate::metrics::{BridgeMetrics, BridgeMetricsSnapshot};
use crate::presence::AppStateTracker;

/// Mutable bridge state, only touched under the ordering lock.
#[derive(Debug)]
struct BridgeInner {
    /// Whether the consumer accepts immediate delivery.
    ready: bool,
    /// Envelopes fired before readiness, oldest first.
    pending: VecDeque<EventEnvelope>,
    /// Current consumer.
    sink: Arc<dyn EventSink>,
    /// Sequence number for the next envelope.
    next_seq: u64,
}

/// Buffers lifecycle events until the consumer is ready, then delivers in order.
#[derive(Debug)]
pub struct EventBridge {
    inner: Mutex<BridgeInner>,
    /// Source of the app state stamped on each envelope.
    app_state: Arc<AppStateTracker>,
    metrics: BridgeMetrics,
    /// Pending length past which buffering is logged as a warning.
    backlog_warning: usize,
}

impl EventBridge {
    /// Create a bridge delivering to `sink`, initially not ready.
    pub fn new(
        sink: Arc<dyn EventSink>,
        app_state: Arc<AppStateTracker>,
        backlog_warning: usize,
    ) -> Self {
        Self {
            inner: Mutex::new(BridgeInner {
                ready: false,
                pending: VecDeque::new(),
                sink,
                next_seq: 0,
            }),
            app_state,
            metrics: BridgeMetrics::new(),
            backlog_warning,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BridgeInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fire an event with an optional record or payload snapshot.
    ///
    /// Buffers while the consumer is not ready. Once ready, delivers
    /// synchronously; a sink failure is returned and the envelope is dropped.
    pub fn fire(&self, event: EventName, record: Option<Value>) -> AppResult<()> {
        let app_state = self.app_state.current();
        let mut inner = self.lock();

        let seq = inner.next_seq;
        inner.next_seq += 1;
        let envelope = EventEnvelope::new(seq, event, record, app_state);
        BridgeMetrics::inc(&self.metrics.fired);

        if !inner.ready {
            inner.pending.push_back(envelope);
            BridgeMetrics::inc(&self.metrics.buffered);

            let backlog = inner.pending.len();
            if backlog > self.backlog_warning {
                warn!(event = %event, seq, backlog, "Consumer not ready, event backlog growing");
            } else {
                debug!(event = %event, seq, backlog, "Consumer not ready, event buffered");
            }
            return Ok(());
        }

        match inner.sink.deliver(envelope) {
            Ok(()) => {
                BridgeMetrics::inc(&self.metrics.delivered);
                debug!(event = %event, seq, "Event delivered");
                Ok(())
            }
            Err(e) => {
                BridgeMetrics::inc(&self.metrics.failed);
                warn!(event = %event, seq, error = %e, "Event dropped, consumer unreachable");
                Err(e)
            }
        }
    }

    /// Signal that the consumer is ready.
    ///
    /// The first call after construction or `mark_not_ready` flushes every
    /// buffered envelope in fire order and returns how many were delivered.
    /// Further calls are no-ops returning `0`.
    pub fn mark_ready(&self) -> usize {
        let mut inner = self.lock();
        if inner.ready {
            return 0;
        }

        inner.ready = true;
        let pending = std::mem::take(&mut inner.pending);
        let total = pending.len();
        let mut delivered = 0;

        for envelope in pending {
            let (event, seq) = (envelope.event, envelope.seq);
            match inner.sink.deliver(envelope) {
                Ok(()) => {
                    delivered += 1;
                    BridgeMetrics::inc(&self.metrics.flushed);
                }
                Err(e) => {
                    BridgeMetrics::inc(&self.metrics.failed);
                    warn!(event = %event, seq, error = %e, "Buffered event dropped during flush");
                }
            }
        }

        info!(delivered, buffered = total, "Consumer ready, buffered events flushed");
        delivered
    }

    /// Signal that the consumer became unreachable.
    ///
    /// Buffered events are kept and new ones accumulate until the next
    /// `mark_ready`.
    pub fn mark_not_ready(&self) {
        let mut inner = self.lock();
        if inner.ready {
            inner.ready = false;
            info!("Consumer detached, buffering events");
        }
    }

    /// Replace the consumer sink, e.g. after the host recreated its runtime.
    pub fn attach(&self, sink: Arc<dyn EventSink>) {
        let mut inner = self.lock();
        inner.sink = sink;
        debug!(ready = inner.ready, "Event consumer attached");
    }

    /// Whether events are currently delivered immediately.
    pub fn is_ready(&self) -> bool {
        self.lock().ready
    }

    /// Number of buffered envelopes.
    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Traffic counters.
    pub fn metrics(&self) -> BridgeMetricsSnapshot {
        self.metrics.snapshot()
    }
}
