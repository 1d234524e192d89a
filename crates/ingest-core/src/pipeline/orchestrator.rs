//! Automatic path: one drop, one sequential batch.

use super::processor::ItemProcessor;
use crate::collaborators::IngestObserver;
use crate::models::{BatchProgress, BatchSession, BatchSummary, Notice};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Runs dropped path lists through the item processor in arrival order.
pub struct BatchOrchestrator {
    processor: Arc<ItemProcessor>,
    observer: Arc<dyn IngestObserver>,
    last_session: Mutex<BatchSession>,
}

impl BatchOrchestrator {
    pub fn new(processor: Arc<ItemProcessor>, observer: Arc<dyn IngestObserver>) -> Self {
        Self {
            processor,
            observer,
            last_session: Mutex::new(BatchSession::default()),
        }
    }

    /// Process `paths` and report the tally.
    pub async fn run_batch(&self, paths: Vec<PathBuf>) -> BatchSummary {
        self.run_batch_with_progress(paths, None).await
    }

    /// Process `paths` one at a time, optionally streaming progress.
    ///
    /// # Arguments
    ///
    /// * `paths` - Paths in the order the platform reported them
    /// * `progress_tx` - Optional channel for per-item progress updates
    pub async fn run_batch_with_progress(
        &self,
        paths: Vec<PathBuf>,
        progress_tx: Option<mpsc::Sender<BatchProgress>>,
    ) -> BatchSummary {
        if paths.is_empty() {
            self.observer.on_notice(&Notice::nothing_to_add());
            return BatchSummary::default();
        }

        let total = paths.len();
        info!("Starting batch of {} path(s)", total);

        let mut summary = BatchSummary::default();
        let mut session = BatchSession::default();
        let mut progress = BatchProgress::new(total);

        for (idx, path) in paths.into_iter().enumerate() {
            let current = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .or_else(|| Some(path.display().to_string()));
            progress.update(idx, current);
            self.emit_progress(&progress, progress_tx.as_ref()).await;

            let (item, success) = self
                .processor
                .process_path(&path, self.observer.as_ref())
                .await;
            debug!("{} finished as {}", path.display(), item.status);

            summary.record(success);
            session.items.push(item);
            session.current_index = idx + 1;
        }

        progress.update(total, None);
        self.emit_progress(&progress, progress_tx.as_ref()).await;

        info!(
            "Batch finished: {} succeeded, {} failed",
            summary.success_count, summary.error_count
        );
        self.observer.on_notice(&summary.notice());
        self.observer.on_batch_complete(&summary);

        *self
            .last_session
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = session;

        summary
    }

    /// Items of the most recently finished batch.
    pub fn last_session(&self) -> BatchSession {
        self.last_session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn emit_progress(
        &self,
        progress: &BatchProgress,
        progress_tx: Option<&mpsc::Sender<BatchProgress>>,
    ) {
        self.observer.on_progress(progress);
        if let Some(tx) = progress_tx {
            let _ = tx.send(progress.clone()).await;
        }
    }
}
