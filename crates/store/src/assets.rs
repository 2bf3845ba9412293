//! Disk storage for uploaded and generated images, addressed by filename.

use std::path::PathBuf;

use restyle_core::assets::{content_type_for_filename, is_plain_filename};
use tokio::fs;

use crate::error::StoreError;

/// Flat directory of image files.
///
/// Callers supply names that are already unique (timestamp prefixed); the
/// store only guarantees they stay inside its root.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist `bytes` under `filename`, creating the root directory if it
    /// is missing. Returns the filename the asset was stored under.
    pub async fn write(&self, bytes: &[u8], filename: &str) -> Result<String, StoreError> {
        if !is_plain_filename(filename) {
            return Err(StoreError::InvalidName(filename.to_string()));
        }
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::io(&self.root, e))?;

        let path = self.root.join(filename);
        fs::write(&path, bytes)
            .await
            .map_err(|e| StoreError::io(&path, e))?;

        tracing::debug!(filename, bytes = bytes.len(), "Stored asset");
        Ok(filename.to_string())
    }

    /// Read an asset's bytes. Unknown or unsafe names are `NotFound`.
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(filename)?;
        fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(filename.to_string())
            } else {
                StoreError::io(&path, e)
            }
        })
    }

    /// Remove an asset. Deleting a file that is already gone is not an
    /// error.
    pub async fn delete(&self, filename: &str) -> Result<(), StoreError> {
        let path = match self.resolve(filename) {
            Ok(path) => path,
            Err(_) => return Ok(()),
        };
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(filename, "Deleted asset");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&path, e)),
        }
    }

    pub async fn exists(&self, filename: &str) -> bool {
        match self.resolve(filename) {
            Ok(path) => fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false),
            Err(_) => false,
        }
    }

    /// MIME type served for an asset, inferred from its extension.
    pub fn content_type_of(&self, filename: &str) -> &'static str {
        content_type_for_filename(filename)
    }

    /// Whether the root directory exists or can be created.
    pub async fn health_check(&self) -> bool {
        fs::create_dir_all(&self.root).await.is_ok()
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf, StoreError> {
        if is_plain_filename(filename) {
            Ok(self.root.join(filename))
        } else {
            Err(StoreError::NotFound(filename.to_string()))
        }
    }
}
