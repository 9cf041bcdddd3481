//! Core traits defined in `tidings-core` and implemented by other crates.

pub mod sink;

pub use sink::EventSink;
