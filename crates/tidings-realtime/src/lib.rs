//! # tidings-realtime
//!
//! Event delivery for Tidings. Provides:
//!
//! - An ordered event bridge that buffers lifecycle events until the
//!   consumer signals readiness, then flushes them in fire order
//! - A channel-backed event sink for consumers running on another task
//! - Foreground/background application state tracking
//! - Delivery metrics

pub mod bridge;
pub mod metrics;
pub mod presence;

pub use bridge::{ChannelSink, EventBridge};
pub use metrics::BridgeMetrics;
pub use presence::AppStateTracker;
