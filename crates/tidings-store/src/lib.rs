//! # tidings-store
//!
//! Authoritative in-memory collection of notification records, classified
//! by lifecycle state. All mutations go through a single writer lock so
//! readers only ever observe committed snapshots.

pub mod lifecycle;

pub use lifecycle::LifecycleStore;
