//! Output that records playbacks in the log instead of a device.

use std::path::{Path, PathBuf};

use tracing::info;

use tidings_core::result::AppResult;

use crate::traits::{AudioOutput, PlaybackHandle};

/// Logs every started and stopped playback.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingOutput;

#[derive(Debug)]
struct LoggedPlayback {
    path: PathBuf,
    stopped: bool,
}

impl PlaybackHandle for LoggedPlayback {
    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            info!(path = %self.path.display(), "Playback stopped");
        }
    }
}

impl AudioOutput for LoggingOutput {
    fn start(&self, path: &Path, looping: bool) -> AppResult<Box<dyn PlaybackHandle>> {
        info!(path = %path.display(), looping, "Playback started");
        Ok(Box::new(LoggedPlayback {
            path: path.to_path_buf(),
            stopped: false,
        }))
    }
}
