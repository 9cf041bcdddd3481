//! Transient copies of assets handed to the output device.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use tracing::{debug, warn};

use tidings_core::error::{AppError, ErrorKind};
use tidings_core::result::AppResult;

/// Writes staged assets into a scratch directory and removes them again.
#[derive(Debug, Clone)]
pub struct AssetStager {
    dir: PathBuf,
}

impl AssetStager {
    /// Create a stager writing into `dir`, created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Scratch directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `data` to a fresh file and return its path.
    pub async fn stage(&self, data: &Bytes) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ResourceUnavailable,
                format!("Failed to create staging directory: {}", self.dir.display()),
                e,
            )
        })?;

        let path = self.dir.join(format!("noise-{}.wav", uuid::Uuid::new_v4()));
        fs::write(&path, data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ResourceUnavailable,
                format!("Failed to stage asset: {}", path.display()),
                e,
            )
        })?;

        debug!(path = %path.display(), bytes = data.len(), "Asset staged");
        Ok(path)
    }

    /// Delete a staged file. Failures are logged, never returned.
    pub async fn discard(&self, path: &Path) {
        match fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "Staged asset removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove staged asset"),
        }
    }
}
