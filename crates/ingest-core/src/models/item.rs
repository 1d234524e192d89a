//! Ingest items, their status state machine, and the batch session.

use super::shortcut::IconPayload;
use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Classification of a path: file or directory plus a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathDescriptor {
    pub path: PathBuf,
    pub is_directory: bool,
    pub display_name: String,
}

/// Processing status of an ingest item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Processing,
    Success,
    Error,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Processing => "processing",
            ItemStatus::Success => "success",
            ItemStatus::Error => "error",
        }
    }

    /// `success` and `error` accept no further automatic transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Success | ItemStatus::Error)
    }

    /// Forward-only transition table. Returning to `pending` goes through
    /// `IngestItem::reset` instead.
    pub fn can_advance_to(&self, next: ItemStatus) -> bool {
        matches!(
            (self, next),
            (ItemStatus::Pending, ItemStatus::Processing)
                | (ItemStatus::Processing, ItemStatus::Success)
                | (ItemStatus::Processing, ItemStatus::Error)
        )
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One path moving through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestItem {
    /// Assigned at intake, stable for the item's lifetime.
    pub id: String,
    pub path: PathBuf,
    pub is_directory: bool,
    pub display_name: String,
    pub status: ItemStatus,
    /// Set only while `status` is `error`.
    pub error_detail: Option<String>,
    /// Set only when the icon source produced an icon.
    pub icon_data: Option<IconPayload>,
}

impl IngestItem {
    /// Create a pending item from a classified path.
    pub fn from_descriptor(descriptor: PathDescriptor) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            path: descriptor.path,
            is_directory: descriptor.is_directory,
            display_name: descriptor.display_name,
            status: ItemStatus::Pending,
            error_detail: None,
            icon_data: None,
        }
    }

    /// Create an item that failed before it could be classified.
    ///
    /// The display name falls back to the last path component.
    pub fn unclassified(path: &Path, detail: impl Into<String>) -> Self {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            path: path.to_path_buf(),
            is_directory: false,
            display_name,
            status: ItemStatus::Error,
            error_detail: Some(detail.into()),
            icon_data: None,
        }
    }

    /// Rebuild the descriptor this item was created from.
    pub fn descriptor(&self) -> PathDescriptor {
        PathDescriptor {
            path: self.path.clone(),
            is_directory: self.is_directory,
            display_name: self.display_name.clone(),
        }
    }

    fn advance(&mut self, next: ItemStatus) -> Result<()> {
        if !self.status.can_advance_to(next) {
            return Err(IngestError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// `pending -> processing`.
    pub fn begin_processing(&mut self) -> Result<()> {
        self.advance(ItemStatus::Processing)
    }

    /// `processing -> success`, attaching the icon if one was resolved.
    pub fn mark_success(&mut self, icon: Option<IconPayload>) -> Result<()> {
        self.advance(ItemStatus::Success)?;
        self.icon_data = icon;
        self.error_detail = None;
        Ok(())
    }

    /// `processing -> error` with a human-readable cause.
    pub fn mark_error(&mut self, detail: impl Into<String>) -> Result<()> {
        self.advance(ItemStatus::Error)?;
        self.error_detail = Some(detail.into());
        self.icon_data = None;
        Ok(())
    }

    /// Return the item to `pending`, clearing the error and icon.
    pub fn reset(&mut self) {
        self.status = ItemStatus::Pending;
        self.error_detail = None;
        self.icon_data = None;
    }
}

/// Run state of one batch: ordered items, cursor and pause flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSession {
    pub items: Vec<IngestItem>,
    /// Index of the next unprocessed item.
    pub current_index: usize,
    pub paused: bool,
}

impl BatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, id: &str) -> Option<&IngestItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Items in a terminal state.
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|i| i.status.is_terminal()).count()
    }

    pub fn success_count(&self) -> usize {
        self.count_status(ItemStatus::Success)
    }

    pub fn error_count(&self) -> usize {
        self.count_status(ItemStatus::Error)
    }

    pub fn count_status(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    /// Progress in percent (0.0-100.0); an empty session reports 0.
    pub fn progress_percent(&self) -> f32 {
        if self.items.is_empty() {
            0.0
        } else {
            self.completed_count() as f32 / self.items.len() as f32 * 100.0
        }
    }

    /// Whether the cursor has passed the last item.
    pub fn is_drained(&self) -> bool {
        self.current_index >= self.items.len()
    }

    /// Whether a `pending` item remains at or after the cursor.
    pub fn has_pending(&self) -> bool {
        self.items
            .get(self.current_index..)
            .is_some_and(|rest| rest.iter().any(|i| i.status == ItemStatus::Pending))
    }
}
