//! Drag events coming in and notices, progress and summaries going out.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Drag lifecycle stage reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragEventKind {
    Enter,
    Over,
    Drop,
    Leave,
}

/// One platform drag notification. `Over` carries no paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragEvent {
    pub kind: DragEventKind,
    #[serde(default)]
    pub paths: Vec<PathBuf>,
    #[serde(default)]
    pub position: Option<(f64, f64)>,
}

impl DragEvent {
    pub fn enter(paths: Vec<PathBuf>) -> Self {
        Self {
            kind: DragEventKind::Enter,
            paths,
            position: None,
        }
    }

    pub fn over(position: Option<(f64, f64)>) -> Self {
        Self {
            kind: DragEventKind::Over,
            paths: Vec::new(),
            position,
        }
    }

    pub fn drop(paths: Vec<PathBuf>) -> Self {
        Self {
            kind: DragEventKind::Drop,
            paths,
            position: None,
        }
    }

    pub fn leave() -> Self {
        Self {
            kind: DragEventKind::Leave,
            paths: Vec::new(),
            position: None,
        }
    }
}

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Notice shown when a batch has nothing to process.
    pub fn nothing_to_add() -> Self {
        Self::new(NoticeLevel::Warning, "No files to add")
    }
}

/// Aggregate outcome of one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub success_count: usize,
    pub error_count: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.success_count + self.error_count
    }

    pub fn record(&mut self, success: bool) {
        if success {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
    }

    /// Aggregate notice for the end of a batch.
    pub fn notice(&self) -> Notice {
        let level = match (self.success_count, self.error_count) {
            (_, 0) => NoticeLevel::Success,
            (0, _) => NoticeLevel::Error,
            _ => NoticeLevel::Warning,
        };
        let message = if self.error_count == 0 {
            format!("Added {} shortcut(s)", self.success_count)
        } else {
            format!(
                "Added {} shortcut(s), {} failed",
                self.success_count, self.error_count
            )
        };
        Notice::new(level, message)
    }
}

/// Progress snapshot emitted at item boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchProgress {
    pub total: usize,
    pub completed: usize,
    /// Display name of the item being processed, if any.
    #[serde(default)]
    pub current: Option<String>,
    /// Overall progress in percent (0.0-100.0).
    pub percent: f32,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            current: None,
            percent: 0.0,
        }
    }

    /// Update progress with the number of completed items and current item name.
    pub fn update(&mut self, completed: usize, current: Option<String>) {
        self.completed = completed;
        self.current = current;
        self.percent = if self.total > 0 {
            completed as f32 / self.total as f32 * 100.0
        } else {
            100.0
        };
    }
}
