//! Manual path: a user-curated list processed on demand.
//!
//! The controller owns the [`BatchSession`] and publishes every change
//! through a `watch` channel. Processing resumes from the cursor, so a
//! paused run continues where it stopped without reprocessing finished
//! items.

use super::guard::ConcurrencyGuard;
use super::processor::ItemProcessor;
use crate::collaborators::{FileDialog, IngestObserver};
use crate::config::IngestOptions;
use crate::error::{IngestError, Result};
use crate::models::{BatchProgress, BatchSession, BatchSummary, IngestItem, ItemStatus, Notice};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// How a call to [`ManualQueueController::start`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The cursor reached the end of the list.
    Completed(BatchSummary),
    /// `pause()` took effect at an item boundary.
    Paused,
    /// Another `start()` on this queue is still running.
    AlreadyRunning,
    /// The shared guard is held by another path.
    Busy,
    /// Nothing was pending.
    Empty,
}

/// Controller for the manual queue.
///
/// Cheap to clone; clones drive the same session.
#[derive(Clone)]
pub struct ManualQueueController {
    processor: Arc<ItemProcessor>,
    observer: Arc<dyn IngestObserver>,
    dialog: Option<Arc<dyn FileDialog>>,
    run_guard: ConcurrencyGuard,
    shared_guard: Option<ConcurrencyGuard>,
    inter_item_delay: Duration,
    session: Arc<watch::Sender<BatchSession>>,
}

impl ManualQueueController {
    pub fn new(
        processor: Arc<ItemProcessor>,
        observer: Arc<dyn IngestObserver>,
        options: &IngestOptions,
    ) -> Self {
        let (session, _) = watch::channel(BatchSession::default());
        Self {
            processor,
            observer,
            dialog: None,
            run_guard: ConcurrencyGuard::new(),
            shared_guard: None,
            inter_item_delay: options.inter_item_delay(),
            session: Arc::new(session),
        }
    }

    /// Attach the dialog used by [`add_from_dialog`](Self::add_from_dialog).
    pub fn with_dialog(mut self, dialog: Arc<dyn FileDialog>) -> Self {
        self.dialog = Some(dialog);
        self
    }

    /// Share a concurrency guard with another path (usually the coalescer).
    pub fn with_guard(mut self, guard: ConcurrencyGuard) -> Self {
        self.shared_guard = Some(guard);
        self
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> BatchSession {
        self.session.borrow().clone()
    }

    /// Receive every session change.
    pub fn subscribe(&self) -> watch::Receiver<BatchSession> {
        self.session.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.run_guard.is_busy()
    }

    /// Classify `path` and append it as a pending item.
    ///
    /// No validation or icon lookup happens here. A classification failure
    /// is returned and nothing is added.
    pub async fn add_path(&self, path: &Path) -> Result<IngestItem> {
        let item = self.processor.intake(path).await?;
        debug!("Queued {} ({})", item.display_name, item.id);

        self.session.send_modify(|session| session.items.push(item.clone()));
        Ok(item)
    }

    /// Ask the dialog for a path and queue it.
    ///
    /// A cancelled dialog is `Ok(None)`.
    pub async fn add_from_dialog(&self) -> Result<Option<IngestItem>> {
        let dialog = self.dialog.as_ref().ok_or_else(|| IngestError::Config {
            message: "No file dialog configured".to_string(),
        })?;

        match dialog.open_file_dialog().await? {
            Some(path) => self.add_path(&path).await.map(Some),
            None => {
                debug!("File dialog cancelled");
                Ok(None)
            }
        }
    }

    /// Remove an item that is not currently being processed.
    pub fn remove_item(&self, id: &str) -> Result<IngestItem> {
        let mut result = Err(IngestError::ItemNotFound { id: id.to_string() });

        self.session.send_if_modified(|session| {
            let Some(pos) = session.position(id) else {
                return false;
            };
            if session.items[pos].status == ItemStatus::Processing {
                result = Err(IngestError::ItemBusy { id: id.to_string() });
                return false;
            }
            let item = session.items.remove(pos);
            if pos < session.current_index {
                session.current_index -= 1;
            }
            result = Ok(item);
            true
        });

        result
    }

    /// Empty the list and rewind the cursor.
    ///
    /// Allowed mid-run: the in-flight item finishes and its result is dropped.
    pub fn clear_all(&self) {
        self.session.send_modify(|session| {
            session.items.clear();
            session.current_index = 0;
        });
        info!("Queue cleared");
    }

    /// Return every item to `pending` and rewind the cursor.
    pub fn reset_statuses(&self) -> Result<()> {
        if self.is_running() {
            return Err(IngestError::QueueRunning);
        }

        self.session.send_modify(|session| {
            for item in &mut session.items {
                item.reset();
            }
            session.current_index = 0;
        });
        info!("Queue statuses reset");
        Ok(())
    }

    /// Stop at the next item boundary. The in-flight item always finishes.
    pub fn pause(&self) {
        let changed = self.session.send_if_modified(|session| {
            let was_paused = session.paused;
            session.paused = true;
            !was_paused
        });
        if changed {
            info!("Queue pause requested");
        }
    }

    /// Continue from the cursor.
    pub async fn resume(&self) -> StartOutcome {
        self.start().await
    }

    /// Process pending items from the cursor until the end or a pause.
    pub async fn start(&self) -> StartOutcome {
        let Some(_run) = self.run_guard.try_acquire() else {
            debug!("Queue already running");
            return StartOutcome::AlreadyRunning;
        };
        let _shared = match &self.shared_guard {
            Some(guard) => match guard.try_acquire() {
                Some(permit) => Some(permit),
                None => {
                    debug!("Another batch holds the shared guard");
                    return StartOutcome::Busy;
                }
            },
            None => None,
        };

        self.session.send_if_modified(|session| {
            let was_paused = session.paused;
            session.paused = false;
            was_paused
        });
        info!("Queue started at item {}", self.session.borrow().current_index);

        let mut processed = 0usize;
        while let Some(mut item) = self.next_item() {
            self.observer.on_item_updated(&item);

            self.processor.process(&mut item, self.observer.as_ref()).await;
            processed += 1;

            let more = self.store_result(item);
            if more && !self.inter_item_delay.is_zero() {
                tokio::time::sleep(self.inter_item_delay).await;
            }
        }

        let session = self.session();
        if session.paused {
            if session.has_pending() {
                info!(
                    "Queue paused after {}/{} item(s)",
                    session.completed_count(),
                    session.len()
                );
                return StartOutcome::Paused;
            }
            // The pause landed on the last item; the run is complete.
            debug!("Pause requested after the last pending item");
            self.session.send_modify(|s| s.paused = false);
        }

        if processed == 0 {
            self.observer.on_notice(&Notice::nothing_to_add());
            return StartOutcome::Empty;
        }
        if session.is_empty() {
            info!("Queue was cleared during the run");
            return StartOutcome::Empty;
        }

        let summary = BatchSummary {
            success_count: session.success_count(),
            error_count: session.error_count(),
        };
        info!(
            "Queue finished: {} succeeded, {} failed",
            summary.success_count, summary.error_count
        );
        self.observer.on_notice(&summary.notice());
        self.observer.on_batch_complete(&summary);
        StartOutcome::Completed(summary)
    }

    /// Advance the cursor to the next pending item and mark it `processing`.
    fn next_item(&self) -> Option<IngestItem> {
        let mut next = None;

        self.session.send_if_modified(|session| {
            if session.paused {
                return false;
            }

            let start = session.current_index;
            while session.current_index < session.items.len()
                && session.items[session.current_index].status != ItemStatus::Pending
            {
                session.current_index += 1;
            }

            let Some(item) = session.items.get_mut(session.current_index) else {
                return session.current_index != start;
            };
            if let Err(e) = item.begin_processing() {
                warn!("Cannot start item {}: {}", item.id, e);
                return session.current_index != start;
            }
            next = Some(item.clone());
            true
        });

        next
    }

    /// Write a finished item back and report whether more work is pending.
    fn store_result(&self, item: IngestItem) -> bool {
        let mut progress = None;
        let mut more = false;

        self.session.send_if_modified(|session| {
            let Some(pos) = session.position(&item.id) else {
                debug!("Item {} was removed while processing", item.id);
                return false;
            };
            session.items[pos] = item.clone();
            session.current_index = pos + 1;

            let mut snapshot = BatchProgress::new(session.len());
            snapshot.update(session.completed_count(), Some(item.display_name.clone()));
            progress = Some(snapshot);

            more = !session.paused && session.has_pending();
            true
        });

        if let Some(progress) = progress {
            self.observer.on_progress(&progress);
        }
        more
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoticeLevel;
    use crate::pipeline::test_support::{FakeBackend, RecordingObserver, ScriptedDialog};
    use std::path::PathBuf;

    struct Fixture {
        backend: Arc<FakeBackend>,
        observer: Arc<RecordingObserver>,
        queue: ManualQueueController,
    }

    fn fixture(backend: FakeBackend) -> Fixture {
        let backend = Arc::new(backend);
        let observer = Arc::new(RecordingObserver::default());
        let options = IngestOptions::default();
        let processor = Arc::new(ItemProcessor::new(&backend.collaborators(), &options));
        let queue = ManualQueueController::new(processor, observer.clone(), &options);
        Fixture {
            backend,
            observer,
            queue,
        }
    }

    #[tokio::test]
    async fn test_add_path_classifies_only() {
        let fx = fixture(FakeBackend::new().with_dir("/tmp/docs"));

        let item = fx.queue.add_path(Path::new("/tmp/docs")).await.unwrap();

        assert_eq!(item.status, ItemStatus::Pending);
        assert!(item.is_directory);
        assert_eq!(item.display_name, "docs");
        assert_eq!(fx.queue.session().items, vec![item]);
        assert!(fx.backend.created().is_empty());
    }

    #[tokio::test]
    async fn test_add_path_lookup_failure() {
        let fx = fixture(FakeBackend::new());
        let err = fx.queue.add_path(Path::new("/tmp/unreadable")).await.unwrap_err();
        assert!(matches!(err, IngestError::Lookup { .. }));
        assert!(fx.queue.session().is_empty());
    }

    #[tokio::test]
    async fn test_add_from_dialog() {
        let fx = fixture(FakeBackend::new().with_file("/tmp/a.txt"));
        let queue = fx
            .queue
            .clone()
            .with_dialog(Arc::new(ScriptedDialog::new(vec![Some("/tmp/a.txt"), None])));

        let added = queue.add_from_dialog().await.unwrap();
        assert_eq!(added.unwrap().display_name, "a.txt");

        // Cancelled dialog is a silent no-op.
        assert!(queue.add_from_dialog().await.unwrap().is_none());
        assert_eq!(queue.session().len(), 1);
        assert!(fx.observer.notices().is_empty());
    }

    #[tokio::test]
    async fn test_add_from_dialog_without_dialog() {
        let fx = fixture(FakeBackend::new());
        let err = fx.queue.add_from_dialog().await.unwrap_err();
        assert!(matches!(err, IngestError::Config { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_processes_in_order() {
        let fx = fixture(
            FakeBackend::new()
                .with_file("/tmp/x.txt")
                .with_file("/tmp/y.txt"),
        );
        fx.queue.add_path(Path::new("/tmp/x.txt")).await.unwrap();
        fx.queue.add_path(Path::new("/tmp/missing")).await.unwrap();
        fx.queue.add_path(Path::new("/tmp/y.txt")).await.unwrap();

        let outcome = fx.queue.start().await;

        let expected = BatchSummary {
            success_count: 2,
            error_count: 1,
        };
        assert_eq!(outcome, StartOutcome::Completed(expected));
        assert_eq!(
            fx.backend.created_paths(),
            vec![PathBuf::from("/tmp/x.txt"), PathBuf::from("/tmp/y.txt")]
        );
        assert_eq!(fx.observer.completions(), vec![expected]);

        let session = fx.queue.session();
        assert_eq!(session.current_index, 3);
        assert_eq!(session.progress_percent(), 100.0);
        assert!(session.items[1]
            .error_detail
            .as_deref()
            .unwrap()
            .contains("does not exist"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_after_first_item_then_resume() {
        let fx = fixture(
            FakeBackend::new()
                .with_file("/tmp/x.txt")
                .with_file("/tmp/y.txt"),
        );
        let x = fx.queue.add_path(Path::new("/tmp/x.txt")).await.unwrap();
        let y = fx.queue.add_path(Path::new("/tmp/y.txt")).await.unwrap();

        let mut rx = fx.queue.subscribe();
        let queue = fx.queue.clone();
        let run = tokio::spawn(async move { queue.start().await });

        rx.wait_for(|s| s.item(&x.id).map(|i| i.status) == Some(ItemStatus::Success))
            .await
            .unwrap();
        fx.queue.pause();

        assert_eq!(run.await.unwrap(), StartOutcome::Paused);
        let session = fx.queue.session();
        assert_eq!(session.item(&y.id).unwrap().status, ItemStatus::Pending);
        assert_eq!(session.current_index, 1);
        assert!(fx.observer.completions().is_empty());

        let outcome = fx.queue.resume().await;
        assert!(matches!(outcome, StartOutcome::Completed(s) if s.success_count == 2));
        assert_eq!(
            fx.backend.created_paths(),
            vec![PathBuf::from("/tmp/x.txt"), PathBuf::from("/tmp/y.txt")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_during_last_item_completes_batch() {
        let fx = fixture(
            FakeBackend::new()
                .with_file("/tmp/x.txt")
                .with_file("/tmp/y.txt")
                .with_create_latency(Duration::from_secs(1)),
        );
        fx.queue.add_path(Path::new("/tmp/x.txt")).await.unwrap();
        let y = fx.queue.add_path(Path::new("/tmp/y.txt")).await.unwrap();

        let mut rx = fx.queue.subscribe();
        let queue = fx.queue.clone();
        let run = tokio::spawn(async move { queue.start().await });

        rx.wait_for(|s| s.item(&y.id).map(|i| i.status) == Some(ItemStatus::Processing))
            .await
            .unwrap();
        fx.queue.pause();

        let expected = BatchSummary {
            success_count: 2,
            error_count: 0,
        };
        assert_eq!(run.await.unwrap(), StartOutcome::Completed(expected));
        assert_eq!(fx.observer.completions(), vec![expected]);
        assert!(!fx.queue.session().paused);
        assert_eq!(fx.backend.created().len(), 2);

        // Nothing left to resume.
        assert_eq!(fx.queue.resume().await, StartOutcome::Empty);
        assert_eq!(fx.observer.completions().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_items_never_regress_without_reset() {
        let fx = fixture(FakeBackend::new().with_file("/tmp/x.txt"));
        fx.queue.add_path(Path::new("/tmp/x.txt")).await.unwrap();
        fx.queue.add_path(Path::new("/tmp/gone")).await.unwrap();

        fx.queue.start().await;
        assert_eq!(fx.queue.start().await, StartOutcome::Empty);

        for update in fx.observer.updates() {
            let id = update.id.clone();
            let history: Vec<ItemStatus> = fx
                .observer
                .updates()
                .into_iter()
                .filter(|u| u.id == id)
                .map(|u| u.status)
                .collect();
            assert_eq!(history, vec![ItemStatus::Processing, history[1]]);
            assert!(history[1].is_terminal());
        }
        assert_eq!(fx.backend.created().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_statuses() {
        let fx = fixture(FakeBackend::new().with_file("/tmp/x.txt"));
        fx.queue.add_path(Path::new("/tmp/x.txt")).await.unwrap();
        fx.queue.add_path(Path::new("/tmp/gone")).await.unwrap();
        fx.queue.start().await;

        fx.queue.reset_statuses().unwrap();

        let session = fx.queue.session();
        assert_eq!(session.current_index, 0);
        for item in &session.items {
            assert_eq!(item.status, ItemStatus::Pending);
            assert!(item.error_detail.is_none());
            assert!(item.icon_data.is_none());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_refused_while_running() {
        let fx = fixture(
            FakeBackend::new()
                .with_file("/tmp/x.txt")
                .with_create_latency(Duration::from_secs(1)),
        );
        fx.queue.add_path(Path::new("/tmp/x.txt")).await.unwrap();

        let queue = fx.queue.clone();
        let run = tokio::spawn(async move { queue.start().await });
        let mut rx = fx.queue.subscribe();
        rx.wait_for(|s| s.items[0].status == ItemStatus::Processing)
            .await
            .unwrap();

        assert!(matches!(
            fx.queue.reset_statuses(),
            Err(IngestError::QueueRunning)
        ));
        assert_eq!(fx.queue.start().await, StartOutcome::AlreadyRunning);
        assert!(matches!(run.await.unwrap(), StartOutcome::Completed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_item() {
        let fx = fixture(
            FakeBackend::new()
                .with_file("/tmp/x.txt")
                .with_file("/tmp/y.txt"),
        );
        let x = fx.queue.add_path(Path::new("/tmp/x.txt")).await.unwrap();
        let y = fx.queue.add_path(Path::new("/tmp/y.txt")).await.unwrap();
        fx.queue.session.send_modify(|s| {
            s.items[0].begin_processing().unwrap();
            s.items[0].mark_success(None).unwrap();
            s.current_index = 1;
        });

        let removed = fx.queue.remove_item(&x.id).unwrap();
        assert_eq!(removed.id, x.id);
        let session = fx.queue.session();
        assert_eq!(session.current_index, 0);
        assert_eq!(session.items[0].id, y.id);

        assert!(matches!(
            fx.queue.remove_item("nope"),
            Err(IngestError::ItemNotFound { .. })
        ));

        assert!(matches!(fx.queue.start().await, StartOutcome::Completed(_)));
        assert_eq!(fx.backend.created_paths(), vec![PathBuf::from("/tmp/y.txt")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_processing_item_refused() {
        let fx = fixture(
            FakeBackend::new()
                .with_file("/tmp/x.txt")
                .with_create_latency(Duration::from_secs(1)),
        );
        let x = fx.queue.add_path(Path::new("/tmp/x.txt")).await.unwrap();

        let queue = fx.queue.clone();
        let run = tokio::spawn(async move { queue.start().await });
        let mut rx = fx.queue.subscribe();
        rx.wait_for(|s| s.items[0].status == ItemStatus::Processing)
            .await
            .unwrap();

        assert!(matches!(
            fx.queue.remove_item(&x.id),
            Err(IngestError::ItemBusy { .. })
        ));
        run.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_all_mid_run_discards_result() {
        let fx = fixture(
            FakeBackend::new()
                .with_file("/tmp/x.txt")
                .with_create_latency(Duration::from_secs(1)),
        );
        fx.queue.add_path(Path::new("/tmp/x.txt")).await.unwrap();

        let queue = fx.queue.clone();
        let run = tokio::spawn(async move { queue.start().await });
        let mut rx = fx.queue.subscribe();
        rx.wait_for(|s| !s.is_empty() && s.items[0].status == ItemStatus::Processing)
            .await
            .unwrap();

        fx.queue.clear_all();
        assert_eq!(run.await.unwrap(), StartOutcome::Empty);

        let session = fx.queue.session();
        assert!(session.is_empty());
        assert_eq!(session.current_index, 0);
    }

    #[tokio::test]
    async fn test_start_empty() {
        let fx = fixture(FakeBackend::new());

        assert_eq!(fx.queue.start().await, StartOutcome::Empty);
        let notices = fx.observer.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(fx.observer.completions().is_empty());
    }

    #[tokio::test]
    async fn test_shared_guard_busy() {
        let fx = fixture(FakeBackend::new().with_file("/tmp/x.txt"));
        let guard = ConcurrencyGuard::new();
        let queue = fx.queue.clone().with_guard(guard.clone());
        queue.add_path(Path::new("/tmp/x.txt")).await.unwrap();

        let held = guard.try_acquire().unwrap();
        assert_eq!(queue.start().await, StartOutcome::Busy);
        assert_eq!(queue.session().items[0].status, ItemStatus::Pending);

        drop(held);
        assert!(matches!(queue.start().await, StartOutcome::Completed(_)));
        assert!(!guard.is_busy());
    }
}
