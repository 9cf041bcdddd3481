//! Host application state tracking.

pub mod app_state;

pub use app_state::AppStateTracker;
