//! Filesystem-backed asset source.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use tidings_core::error::{AppError, ErrorKind};
use tidings_core::result::AppResult;

use crate::traits::AssetSource;

/// Reads sound assets from a directory.
#[derive(Debug, Clone)]
pub struct LocalAssetSource {
    /// Directory asset references are resolved against.
    root: PathBuf,
}

impl LocalAssetSource {
    /// Create a source rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a reference, refusing anything that escapes the root.
    fn resolve(&self, asset_ref: &str) -> AppResult<PathBuf> {
        let clean = asset_ref.trim_start_matches("file://").trim_start_matches('/');
        let relative = Path::new(clean);

        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if clean.is_empty() || escapes {
            return Err(AppError::validation(format!(
                "Invalid asset reference: {asset_ref}"
            )));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetSource for LocalAssetSource {
    async fn open(&self, asset_ref: &str) -> AppResult<Bytes> {
        let path = self.resolve(asset_ref)?;
        let data = fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Asset not found: {asset_ref}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read asset: {asset_ref}"),
                    e,
                )
            }
        })?;

        debug!(asset = asset_ref, bytes = data.len(), "Asset loaded");
        Ok(Bytes::from(data))
    }
}
