//! Ingest pipeline.
//!
//! One [`ItemProcessor`] does the per-path work. Two callers drive it:
//!
//! - the automatic path: [`EventCoalescer`] debounces drag drops and hands
//!   each surviving drop to the [`BatchOrchestrator`] under a
//!   [`ConcurrencyGuard`];
//! - the manual path: [`ManualQueueController`] keeps a user-curated list
//!   with a cursor and processes it on `start()`, pausable at item
//!   boundaries.

mod classifier;
mod coalescer;
mod debounce;
mod guard;
mod icon;
mod orchestrator;
mod processor;
mod queue;

#[cfg(test)]
pub(crate) mod test_support;

pub use classifier::{shortcut_name, PathClassifier};
pub use coalescer::{CoalescerHandle, CoalescerStats, EventCoalescer};
pub use debounce::{DebouncePhase, Debouncer};
pub use guard::{ConcurrencyGuard, GuardPermit};
pub use icon::IconResolver;
pub use orchestrator::BatchOrchestrator;
pub use processor::ItemProcessor;
pub use queue::{ManualQueueController, StartOutcome};
