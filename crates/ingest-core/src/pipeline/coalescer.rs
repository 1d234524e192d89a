//! Drag event coalescing for the automatic path.
//!
//! Turns the raw `enter`/`over`/`drop`/`leave` stream into a hover flag and
//! debounced batch dispatches. A dispatch only runs if the concurrency guard
//! is free; otherwise it is discarded silently.

use super::debounce::Debouncer;
use super::guard::{ConcurrencyGuard, GuardPermit};
use super::orchestrator::BatchOrchestrator;
use crate::collaborators::{DragEventSource, DragSubscription};
use crate::error::Result;
use crate::models::{DragEvent, DragEventKind};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

/// Counters describing what happened to drop notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoalescerStats {
    /// Batches actually started.
    pub dispatched: u64,
    /// Debounced dispatches dropped because a batch was in flight.
    pub discarded: u64,
    /// Drops replaced by a later drop inside the debounce window.
    pub superseded: u64,
}

#[derive(Debug, Default)]
struct Counters {
    dispatched: AtomicU64,
    discarded: AtomicU64,
    superseded: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> CoalescerStats {
        CoalescerStats {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            superseded: self.superseded.load(Ordering::Relaxed),
        }
    }
}

/// Spawns the coalescing task.
pub struct EventCoalescer;

impl EventCoalescer {
    /// Subscribe to `source` and start coalescing on the current runtime.
    ///
    /// The subscription lives inside the task and is released when the task
    /// ends or the returned handle is dropped.
    pub fn spawn(
        source: &dyn DragEventSource,
        orchestrator: Arc<BatchOrchestrator>,
        guard: ConcurrencyGuard,
        window: Duration,
    ) -> Result<CoalescerHandle> {
        let subscription = source.subscribe()?;
        let (hover_tx, hover_rx) = watch::channel(false);
        let counters = Arc::new(Counters::default());

        let worker = Worker {
            orchestrator,
            guard,
            debouncer: Debouncer::new(window),
            hover: hover_tx,
            counters: counters.clone(),
            in_flight: None,
        };
        let task = tokio::spawn(worker.run(subscription));

        Ok(CoalescerHandle {
            task: Some(task),
            hover: hover_rx,
            counters,
        })
    }
}

/// Owner of a running coalescer.
///
/// Dropping the handle aborts the task, which releases the drag
/// subscription. A batch already dispatched keeps running to completion.
pub struct CoalescerHandle {
    task: Option<JoinHandle<()>>,
    hover: watch::Receiver<bool>,
    counters: Arc<Counters>,
}

impl CoalescerHandle {
    /// Watch the hover flag.
    pub fn hover(&self) -> watch::Receiver<bool> {
        self.hover.clone()
    }

    pub fn is_hovering(&self) -> bool {
        *self.hover.borrow()
    }

    pub fn stats(&self) -> CoalescerStats {
        self.counters.snapshot()
    }

    pub fn dispatched(&self) -> u64 {
        self.counters.dispatched.load(Ordering::Relaxed)
    }

    /// Wait for the source to close, the last pending drop to fire and the
    /// in-flight batch to finish.
    pub async fn finish(mut self) -> CoalescerStats {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        self.counters.snapshot()
    }

    /// Stop immediately, dropping any pending drop.
    pub fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for CoalescerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct Worker {
    orchestrator: Arc<BatchOrchestrator>,
    guard: ConcurrencyGuard,
    debouncer: Debouncer<Vec<PathBuf>>,
    hover: watch::Sender<bool>,
    counters: Arc<Counters>,
    in_flight: Option<JoinHandle<()>>,
}

impl Worker {
    async fn run(mut self, mut subscription: DragSubscription) {
        debug!("Event coalescer started");

        loop {
            let deadline = self.debouncer.deadline();
            tokio::select! {
                event = subscription.recv() => match event {
                    Some(event) => self.on_event(event),
                    None => break,
                },
                _ = wait_until(deadline) => self.fire_due(),
            }
        }

        drop(subscription);
        debug!("Drag source closed");

        if let Some(deadline) = self.debouncer.deadline() {
            sleep_until(deadline).await;
            self.fire_due();
        }
        if let Some(batch) = self.in_flight.take() {
            let _ = batch.await;
        }
        self.set_hover(false);
        debug!("Event coalescer stopped");
    }

    fn on_event(&mut self, event: DragEvent) {
        match event.kind {
            DragEventKind::Enter | DragEventKind::Over => self.set_hover(true),
            DragEventKind::Leave => self.set_hover(false),
            DragEventKind::Drop => {
                self.set_hover(false);
                debug!("Drop of {} path(s)", event.paths.len());
                if self.debouncer.arm(event.paths, Instant::now()) {
                    self.counters.superseded.fetch_add(1, Ordering::Relaxed);
                    debug!("Superseded an earlier drop");
                }
            }
        }
    }

    fn fire_due(&mut self) {
        if let Some(paths) = self.debouncer.poll(Instant::now()) {
            self.dispatch(paths);
        }
    }

    fn dispatch(&mut self, paths: Vec<PathBuf>) {
        let Some(permit) = self.guard.try_acquire() else {
            self.counters.discarded.fetch_add(1, Ordering::Relaxed);
            debug!("Batch in flight, discarding drop of {} path(s)", paths.len());
            return;
        };

        self.counters.dispatched.fetch_add(1, Ordering::Relaxed);
        info!("Dispatching drop of {} path(s)", paths.len());

        let orchestrator = self.orchestrator.clone();
        self.in_flight = Some(tokio::spawn(run_guarded(orchestrator, paths, permit)));
    }

    fn set_hover(&self, active: bool) {
        self.hover.send_if_modified(|hover| {
            if *hover == active {
                false
            } else {
                *hover = active;
                true
            }
        });
    }
}

async fn run_guarded(orchestrator: Arc<BatchOrchestrator>, paths: Vec<PathBuf>, permit: GuardPermit) {
    orchestrator.run_batch(paths).await;
    drop(permit);
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
