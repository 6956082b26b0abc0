//! Export orchestration.
//!
//! Drives the whole pipeline as a single sequential worker: credential
//! acquisition, paginated listing, the per-conversation fetch loop with its
//! politeness delay and cooperative cancellation checks, incremental archive
//! writing, and the final delivery handoff. One conversation's failure is
//! recorded and skipped; failures around listing, the archive file, or
//! delivery abort the run.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::domain::{
    AppConfig, ExportError, ExportOutcome, FailedConversation, Result,
};
use crate::infrastructure::{ArchiveWriter, ConversationApi, CredentialProvider, DeliverySink};

use super::fetcher::fetch_conversation_record;
use super::lister::list_all_conversations;
use super::progress::{format_eta, ProgressObserver};

/// Progress slot reserved for setup and listing; the fetch loop fills the
/// remaining 90 points, and delivery the last few.
const SETUP_PERCENT: u8 = 5;
const FETCH_PERCENT_SPAN: f64 = 90.0;
const SAVING_PERCENT: u8 = 97;

/// Completed conversations required before an ETA is projected.
const ETA_MIN_SAMPLES: usize = 3;

/// Shared cooperative cancellation flag.
///
/// Set by an external cancel request (Ctrl-C) and polled by the orchestrator
/// at its checkpoints; an in-flight request is allowed to complete.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create an unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. No-op if no run is active; the flag is reset
    /// when the next run starts.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Tunables for one orchestrator instance.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Conversations per index page.
    pub page_size: usize,
    /// Politeness delay between consecutive requests.
    pub request_delay: Duration,
    /// Location of the temporary archive while the run is active.
    pub temp_path: PathBuf,
}

impl ExportOptions {
    /// Derive options from the application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.api.page_size,
            request_delay: config.request_delay(),
            temp_path: config.temp_archive_path(),
        }
    }
}

/// The export state machine. At most one run may be active per instance;
/// routing all start/cancel signals to a single instance makes the guard
/// process-wide.
pub struct ExportOrchestrator<A> {
    api: A,
    options: ExportOptions,
    cancel: CancelFlag,
    in_progress: AtomicBool,
}

impl<A: ConversationApi> ExportOrchestrator<A> {
    /// Create an orchestrator over the given API client.
    pub fn new(api: A, options: ExportOptions, cancel: CancelFlag) -> Self {
        Self {
            api,
            options,
            cancel,
            in_progress: AtomicBool::new(false),
        }
    }

    /// Run one export end to end.
    ///
    /// Returns the run's terminal outcome: `Completed` with the skipped
    /// count, or `Cancelled` with no file produced.
    ///
    /// # Errors
    /// Returns [`ExportError::AlreadyRunning`] if a run is active, without
    /// disturbing it. Any other error is the active run's terminal failure;
    /// the temporary archive has been discarded by then.
    pub async fn start(
        &self,
        credentials: &impl CredentialProvider,
        delivery: &impl DeliverySink,
        observer: &impl ProgressObserver,
    ) -> Result<ExportOutcome> {
        if self.in_progress.swap(true, Ordering::SeqCst) {
            return Err(ExportError::AlreadyRunning);
        }
        self.cancel.reset();

        let outcome = self.run(credentials, delivery, observer).await;

        // Cleared on every exit path so a subsequent run may start.
        self.in_progress.store(false, Ordering::SeqCst);
        outcome
    }

    async fn run(
        &self,
        credentials: &impl CredentialProvider,
        delivery: &impl DeliverySink,
        observer: &impl ProgressObserver,
    ) -> Result<ExportOutcome> {
        observer.progress(0, "Connecting to ChatGPT…");
        let credential = credentials.credential().await?;

        observer.progress(2, "Listing conversations…");
        let summaries = list_all_conversations(
            &self.api,
            &credential,
            self.options.page_size,
            self.options.request_delay,
            observer,
        )
        .await?;

        if summaries.is_empty() {
            return Err(ExportError::NoConversations);
        }

        // Checkpoint before anything durable is opened.
        if self.cancel.is_requested() {
            tracing::info!("cancelled before fetching started");
            return Ok(ExportOutcome::Cancelled);
        }

        let total = summaries.len();
        observer.progress(
            SETUP_PERCENT,
            &format!(
                "Fetching {total} conversation{}…",
                if total == 1 { "" } else { "s" }
            ),
        );

        let mut writer = ArchiveWriter::open(&self.options.temp_path).await?;
        let mut errors: Vec<FailedConversation> = Vec::new();
        let mut success_count = 0usize;
        let mut cancelled = false;
        let loop_start = Instant::now();

        for (index, summary) in summaries.iter().enumerate() {
            if self.cancel.is_requested() {
                cancelled = true;
                break;
            }

            match fetch_conversation_record(&self.api, &credential, &summary.id).await {
                Ok(record) => {
                    if let Err(err) = writer.append_record(&record).await {
                        writer.discard().await;
                        return Err(err);
                    }
                    success_count += 1;
                }
                Err(err) => {
                    tracing::warn!(id = %summary.id, %err, "conversation fetch failed, skipping");
                    errors.push(FailedConversation {
                        id: summary.id.clone(),
                        title: summary.display_title().to_string(),
                        error: err.to_string(),
                    });
                }
            }

            let done = index + 1;
            let remaining = total - done;
            let mut status = format!("Exported {done} / {total}");
            if done >= ETA_MIN_SAMPLES && remaining > 0 {
                let per_conversation = loop_start.elapsed() / done as u32;
                status.push_str(" — ");
                status.push_str(&format_eta(per_conversation * remaining as u32));
            }
            status.push('…');
            observer.progress(fetch_percent(done, total), &status);

            if remaining > 0 {
                tokio::time::sleep(self.options.request_delay).await;
            }
        }

        if cancelled {
            tracing::info!(fetched = success_count, "cancelled mid-run, discarding archive");
            writer.discard().await;
            return Ok(ExportOutcome::Cancelled);
        }

        let archive = writer.finalize(&errors, success_count).await?;

        observer.progress(SAVING_PERCENT, "Saving file…");
        let bytes = match archive.read().await {
            Ok(bytes) => bytes,
            Err(err) => {
                archive.remove().await;
                return Err(err);
            }
        };

        let filename = format!("export-{}.json", Utc::now().format("%Y-%m-%d"));
        if let Err(err) = delivery.deliver(&bytes, &filename).await {
            archive.remove().await;
            return Err(err);
        }
        archive.remove().await;

        tracing::info!(
            exported = success_count,
            skipped = errors.len(),
            "export complete"
        );

        Ok(ExportOutcome::Completed {
            skipped: errors.len(),
        })
    }
}

/// Loop progress: the first 5% covers setup and listing, the next 90% the
/// fetch loop.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn fetch_percent(done: usize, total: usize) -> u8 {
    SETUP_PERCENT + ((done as f64 / total as f64) * FETCH_PERCENT_SPAN).round() as u8
}
