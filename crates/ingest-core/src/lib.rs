//! Shortcut Ingest - headless pipeline that turns dropped or queued paths
//! into shortcut records.
//!
//! Paths arrive either from a platform drag-and-drop stream (debounced and
//! guarded so one gesture yields one batch) or from a user-curated manual
//! queue. Both go through the same item processor: validate, confirm
//! existence, resolve an icon, derive a name, create the shortcut.
//!
//! The filesystem, icon extraction, persistence and dialogs are capability
//! traits in [`collaborators`]; [`platform`] and [`store`] ship local
//! implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use shortcut_ingest::{IngestOptions, JsonShortcutStore, ShortcutIngest, TracingObserver};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> shortcut_ingest::Result<()> {
//!     let store = Arc::new(JsonShortcutStore::open("/tmp/shortcuts.json")?);
//!     let ingest = ShortcutIngest::local(store, Arc::new(TracingObserver), IngestOptions::default());
//!
//!     if let Some(summary) = ingest.run_batch(vec!["/etc/hosts".into()]).await {
//!         println!("{} added, {} failed", summary.success_count, summary.error_count);
//!     }
//!     Ok(())
//! }
//! ```

pub mod collaborators;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod platform;
pub mod store;

mod api;

// Re-export commonly used types
pub use api::ShortcutIngest;
pub use collaborators::{
    ChannelDragSource, Collaborators, DragEventSource, DragSubscription, FileDialog, IconSource,
    IngestObserver, NoopObserver, PathInfo, PathInspector, ShortcutSink, TracingObserver,
};
pub use config::{IngestOptions, PipelineConfig};
pub use error::{IngestError, Result};
pub use models::{
    BatchProgress, BatchSession, BatchSummary, DragEvent, DragEventKind, IconPayload, IngestItem,
    ItemStatus, Notice, NoticeLevel, PathDescriptor, ShortcutCreationInput, ShortcutRecord,
};
pub use pipeline::{
    BatchOrchestrator, CoalescerHandle, ConcurrencyGuard, EventCoalescer, ItemProcessor,
    ManualQueueController, StartOutcome,
};
pub use platform::{CachedIconSource, LocalFs};
pub use store::JsonShortcutStore;
