//! Foreground/background tracker, the state stamped onto every fired event.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use tidings_core::events::AppState;

/// Tracks whether the consumer's UI is currently in the foreground.
#[derive(Debug)]
pub struct AppStateTracker {
    background: AtomicBool,
}

impl AppStateTracker {
    /// Create a tracker starting in the given state.
    pub fn new(initial: AppState) -> Self {
        Self {
            background: AtomicBool::new(initial == AppState::Background),
        }
    }

    /// Current state.
    pub fn current(&self) -> AppState {
        if self.background.load(Ordering::SeqCst) {
            AppState::Background
        } else {
            AppState::Foreground
        }
    }

    /// Whether the app is backgrounded.
    pub fn is_background(&self) -> bool {
        self.background.load(Ordering::SeqCst)
    }

    /// Mark the app as visible.
    pub fn set_foreground(&self) {
        if self.background.swap(false, Ordering::SeqCst) {
            debug!("App moved to foreground");
        }
    }

    /// Mark the app as hidden.
    pub fn set_background(&self) {
        if !self.background.swap(true, Ordering::SeqCst) {
            debug!("App moved to background");
        }
    }
}

impl Default for AppStateTracker {
    fn default() -> Self {
        Self::new(AppState::Background)
    }
}
