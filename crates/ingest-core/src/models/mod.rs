//! Data models for the ingestion pipeline.

mod events;
mod item;
mod shortcut;

pub use events::{BatchProgress, BatchSummary, DragEvent, DragEventKind, Notice, NoticeLevel};
pub use item::{BatchSession, IngestItem, ItemStatus, PathDescriptor};
pub use shortcut::{IconPayload, ShortcutCreationInput, ShortcutRecord};
