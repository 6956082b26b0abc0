//! Archive delivery.
//!
//! Hands the finalized archive bytes to wherever the user retrieves them.

use std::path::{Path, PathBuf};

use crate::domain::{ExportError, Result};

/// Destination for the finished archive.
#[allow(async_fn_in_trait)]
pub trait DeliverySink {
    /// Persist the archive under the given filename and return where it
    /// ended up.
    ///
    /// # Errors
    /// Returns error if the archive cannot be persisted.
    async fn deliver(&self, bytes: &[u8], filename: &str) -> Result<PathBuf>;
}

/// Delivers archives into a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirectoryDelivery {
    dir: PathBuf,
}

impl DirectoryDelivery {
    /// Create a sink targeting the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DeliverySink for DirectoryDelivery {
    async fn deliver(&self, bytes: &[u8], filename: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ExportError::storage("Failed to create output directory", e))?;

        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ExportError::storage(format!("Failed to write {}", path.display()), e))?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "archive delivered");

        Ok(path)
    }
}
