//! Ready-wired pipeline.

use crate::collaborators::{Collaborators, DragEventSource, FileDialog, IngestObserver};
use crate::config::IngestOptions;
use crate::error::Result;
use crate::models::BatchSummary;
use crate::pipeline::{
    BatchOrchestrator, CoalescerHandle, ConcurrencyGuard, EventCoalescer, ItemProcessor,
    ManualQueueController,
};
use crate::platform::{CachedIconSource, LocalFs};
use crate::store::JsonShortcutStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Both entry points over one item processor.
///
/// The drag path and the manual queue share a single [`ConcurrencyGuard`],
/// so at most one batch of either kind runs at a time.
pub struct ShortcutIngest {
    options: IngestOptions,
    orchestrator: Arc<BatchOrchestrator>,
    queue: ManualQueueController,
    guard: ConcurrencyGuard,
}

impl ShortcutIngest {
    pub fn new(
        collaborators: Collaborators,
        observer: Arc<dyn IngestObserver>,
        options: IngestOptions,
    ) -> Self {
        let processor = Arc::new(ItemProcessor::new(&collaborators, &options));
        let guard = ConcurrencyGuard::new();
        let orchestrator = Arc::new(BatchOrchestrator::new(processor.clone(), observer.clone()));
        let queue = ManualQueueController::new(processor, observer, &options).with_guard(guard.clone());

        Self {
            options,
            orchestrator,
            queue,
            guard,
        }
    }

    /// Local filesystem inspection, cached default icons and `store`.
    pub fn local(
        store: Arc<JsonShortcutStore>,
        observer: Arc<dyn IngestObserver>,
        options: IngestOptions,
    ) -> Self {
        let fs = Arc::new(LocalFs::new());
        let icons = Arc::new(CachedIconSource::new(fs.clone()));
        Self::new(Collaborators::new(fs, icons, store), observer, options)
    }

    pub fn with_dialog(mut self, dialog: Arc<dyn FileDialog>) -> Self {
        self.queue = self.queue.with_dialog(dialog);
        self
    }

    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    pub fn orchestrator(&self) -> &Arc<BatchOrchestrator> {
        &self.orchestrator
    }

    pub fn queue(&self) -> &ManualQueueController {
        &self.queue
    }

    pub fn guard(&self) -> &ConcurrencyGuard {
        &self.guard
    }

    /// Run `paths` as one automatic batch, bypassing debounce.
    ///
    /// Returns `None` without touching anything if another batch holds the
    /// guard.
    pub async fn run_batch(&self, paths: Vec<PathBuf>) -> Option<BatchSummary> {
        let _permit = self.guard.try_acquire()?;
        Some(self.orchestrator.run_batch(paths).await)
    }

    /// Start coalescing drag events from `source`.
    pub fn watch(&self, source: &dyn DragEventSource) -> Result<CoalescerHandle> {
        EventCoalescer::spawn(
            source,
            self.orchestrator.clone(),
            self.guard.clone(),
            self.options.debounce_window(),
        )
    }
}
