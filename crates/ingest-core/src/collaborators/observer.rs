//! Callbacks the pipeline produces for the rest of the application.

use crate::models::{BatchProgress, BatchSummary, IngestItem, Notice, NoticeLevel, ShortcutRecord};
use std::path::Path;
use tracing::{debug, info, warn};

/// Receiver of pipeline notifications. Every method defaults to a no-op.
pub trait IngestObserver: Send + Sync {
    /// An item changed status.
    fn on_item_updated(&self, _item: &IngestItem) {}

    /// A shortcut was created for `path`. Fired once per created shortcut.
    fn on_item_added(&self, _path: &Path, _record: &ShortcutRecord) {}

    fn on_progress(&self, _progress: &BatchProgress) {}

    /// User-visible toast.
    fn on_notice(&self, _notice: &Notice) {}

    /// Fired once per batch after the last item reached a terminal state.
    fn on_batch_complete(&self, _summary: &BatchSummary) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl IngestObserver for NoopObserver {}

/// Observer that forwards every notification to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl IngestObserver for TracingObserver {
    fn on_item_updated(&self, item: &IngestItem) {
        debug!("{} -> {}", item.path.display(), item.status);
    }

    fn on_item_added(&self, path: &Path, record: &ShortcutRecord) {
        info!("Created shortcut '{}' for {}", record.name, path.display());
    }

    fn on_progress(&self, progress: &BatchProgress) {
        debug!(
            "Progress {}/{} ({:.0}%)",
            progress.completed, progress.total, progress.percent
        );
    }

    fn on_notice(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Warning | NoticeLevel::Error => warn!("{}", notice.message),
            NoticeLevel::Info | NoticeLevel::Success => info!("{}", notice.message),
        }
    }

    fn on_batch_complete(&self, summary: &BatchSummary) {
        info!(
            "Batch complete: {} succeeded, {} failed",
            summary.success_count, summary.error_count
        );
    }
}
