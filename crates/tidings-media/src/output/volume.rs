//! In-process volume stream.

use std::sync::atomic::{AtomicU32, Ordering};

use tracing::debug;

use crate::traits::VolumeControl;

/// Volume level held in memory, bounded by a fixed maximum.
#[derive(Debug)]
pub struct SharedVolume {
    level: AtomicU32,
    max: u32,
}

impl SharedVolume {
    /// Create a stream at `initial`, clamped to `max`.
    pub fn new(initial: u32, max: u32) -> Self {
        Self {
            level: AtomicU32::new(initial.min(max)),
            max,
        }
    }
}

impl VolumeControl for SharedVolume {
    fn current(&self) -> u32 {
        self.level.load(Ordering::SeqCst)
    }

    fn max(&self) -> u32 {
        self.max
    }

    fn set(&self, level: u32) {
        let level = level.min(self.max);
        let previous = self.level.swap(level, Ordering::SeqCst);
        debug!(previous, level, "Notification volume changed");
    }
}
