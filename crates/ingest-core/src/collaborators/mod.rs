//! Capability interfaces consumed by the pipeline.
//!
//! The pipeline orchestrates; the actual file inspection, icon extraction,
//! persistence and dialogs are provided by implementations of these traits.
//! `crate::platform` and `crate::store` ship local implementations.

mod drag;
mod observer;

pub use drag::{ChannelDragSource, DragEventSource, DragSubscription};
pub use observer::{IngestObserver, NoopObserver, TracingObserver};

use crate::error::Result;
use crate::models::{IconPayload, ShortcutCreationInput, ShortcutRecord};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Basic facts about a path as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    pub display_name: String,
    pub is_directory: bool,
}

/// Path inspection and legality checks.
#[async_trait]
pub trait PathInspector: Send + Sync {
    /// Stat the path. Fails with `IngestError::Lookup` if it cannot be inspected.
    async fn get_path_info(&self, path: &Path) -> Result<PathInfo>;

    /// Legality rules for file paths.
    async fn validate_file_path(&self, path: &Path) -> Result<bool>;

    /// Legality rules for directory paths.
    async fn validate_directory_path(&self, path: &Path) -> Result<bool>;

    async fn check_exists(&self, path: &Path) -> Result<bool>;
}

/// Icon extraction.
#[async_trait]
pub trait IconSource: Send + Sync {
    async fn get_file_icon(&self, path: &Path, high_res: bool) -> Result<Option<IconPayload>>;

    async fn get_directory_icon(&self, path: &Path, high_res: bool)
        -> Result<Option<IconPayload>>;
}

/// Shortcut persistence.
#[async_trait]
pub trait ShortcutSink: Send + Sync {
    /// Persist a shortcut. Rejections use `IngestError::Creation` so the
    /// message reaches the user unchanged.
    async fn create_shortcut(&self, input: ShortcutCreationInput) -> Result<ShortcutRecord>;
}

/// File picker. Returning `None` means the user cancelled.
#[async_trait]
pub trait FileDialog: Send + Sync {
    async fn open_file_dialog(&self) -> Result<Option<PathBuf>>;
}

/// The collaborator set shared by every pipeline component.
#[derive(Clone)]
pub struct Collaborators {
    pub paths: Arc<dyn PathInspector>,
    pub icons: Arc<dyn IconSource>,
    pub shortcuts: Arc<dyn ShortcutSink>,
}

impl Collaborators {
    pub fn new(
        paths: Arc<dyn PathInspector>,
        icons: Arc<dyn IconSource>,
        shortcuts: Arc<dyn ShortcutSink>,
    ) -> Self {
        Self {
            paths,
            icons,
            shortcuts,
        }
    }
}
