//! Streaming archive writer.
//!
//! Owns the temporary archive file while an export is running. The document
//! is written in three phases (header, one fragment per conversation,
//! footer) so the full archive never sits in memory and a mid-run failure
//! only risks conversations not yet fetched. The file is only a complete,
//! parseable JSON document after `finalize`; `discard` deletes it without
//! finalizing and leaves nothing behind.

use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::domain::{ConversationRecord, ExportError, FailedConversation, Result};

/// Constant `export_version` field of the archive format.
pub const EXPORT_VERSION: &str = "1.0";

/// Incremental writer for the archive document.
#[derive(Debug)]
pub struct ArchiveWriter {
    file: File,
    path: PathBuf,
    record_count: usize,
}

impl ArchiveWriter {
    /// Create the temporary file and write the document header.
    ///
    /// # Errors
    /// Returns error if the file cannot be created or the header written.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ExportError::storage("Failed to create archive directory", e))?;
        }

        let mut file = File::create(&path)
            .await
            .map_err(|e| ExportError::storage("Failed to create archive file", e))?;

        let header = format!(
            "{{\"export_version\":\"{EXPORT_VERSION}\",\"exported_at\":\"{}\",\"conversations\":[",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        );

        if let Err(err) = file.write_all(header.as_bytes()).await {
            drop(file);
            let _ = tokio::fs::remove_file(&path).await;
            return Err(ExportError::storage("Failed to write archive header", err));
        }

        tracing::debug!(path = %path.display(), "archive opened");

        Ok(Self {
            file,
            path,
            record_count: 0,
        })
    }

    /// Serialize one conversation record and append its fragment.
    ///
    /// Must be called once per successful fetch, in fetch order.
    ///
    /// # Errors
    /// Returns error if serialization or the append fails. The caller is
    /// expected to `discard` the writer afterwards.
    pub async fn append_record(&mut self, record: &ConversationRecord) -> Result<()> {
        let json = serde_json::to_string(record).map_err(ExportError::invalid_response)?;

        if self.record_count > 0 {
            self.file
                .write_all(b",")
                .await
                .map_err(|e| ExportError::storage("Failed to append to archive", e))?;
        }
        self.file
            .write_all(json.as_bytes())
            .await
            .map_err(|e| ExportError::storage("Failed to append to archive", e))?;

        self.record_count += 1;
        Ok(())
    }

    /// Close the conversations array, write the summary footer, and flush.
    ///
    /// The `errors` array is written only when non-empty. After this call
    /// the file contains one complete JSON document.
    ///
    /// # Errors
    /// Returns error if the footer cannot be written; the file is removed
    /// best-effort in that case.
    pub async fn finalize(
        mut self,
        errors: &[FailedConversation],
        success_count: usize,
    ) -> Result<FinalizedArchive> {
        let mut footer = format!("],\"conversation_count\":{success_count}");
        if !errors.is_empty() {
            let errors_json =
                serde_json::to_string(errors).map_err(ExportError::invalid_response)?;
            footer.push_str(",\"errors\":");
            footer.push_str(&errors_json);
        }
        footer.push('}');

        let write_result = async {
            self.file.write_all(footer.as_bytes()).await?;
            self.file.flush().await?;
            self.file.sync_all().await
        }
        .await;

        match write_result {
            Ok(()) => {
                tracing::debug!(
                    records = self.record_count,
                    errors = errors.len(),
                    "archive finalized"
                );
                Ok(FinalizedArchive { path: self.path })
            }
            Err(err) => {
                drop(self.file);
                let _ = tokio::fs::remove_file(&self.path).await;
                Err(ExportError::storage("Failed to finalize archive", err))
            }
        }
    }

    /// Abandon the archive and delete the file. Best-effort: deletion
    /// failures are logged and swallowed.
    pub async fn discard(self) {
        drop(self.file);
        if let Err(err) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!(path = %self.path.display(), %err, "failed to remove discarded archive");
        }
    }

}

/// A finalized, complete archive file ready for delivery.
pub struct FinalizedArchive {
    path: PathBuf,
}

impl FinalizedArchive {
    /// Read the whole document back for delivery.
    ///
    /// # Errors
    /// Returns error if the file cannot be read.
    pub async fn read(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| ExportError::storage("Failed to read finalized archive", e))
    }

    /// Delete the temporary file. Best-effort.
    pub async fn remove(self) {
        if let Err(err) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!(path = %self.path.display(), %err, "failed to remove temporary archive");
        }
    }
}
