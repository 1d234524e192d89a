//! Error types for the shortcut ingestion pipeline.
//!
//! Item-level failures (lookup, validation, existence, creation) are recorded
//! on the `IngestItem` by the processor; the remaining variants describe
//! misuse of the controllers or ambient I/O problems.

use crate::models::ItemStatus;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the ingestion pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    // Item-level errors
    #[error("Cannot inspect path {path:?}: {message}")]
    Lookup { path: PathBuf, message: String },

    #[error("Path is invalid: {}", path.display())]
    Validation { path: PathBuf },

    #[error("Path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Icon resolution failed for {path:?}: {message}")]
    IconResolution { path: PathBuf, message: String },

    /// Rejection from the shortcut collaborator; the message is shown as-is.
    #[error("{0}")]
    Creation(String),

    // Controller errors
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: ItemStatus, to: ItemStatus },

    #[error("Queue item not found: {id}")]
    ItemNotFound { id: String },

    #[error("Queue item is being processed: {id}")]
    ItemBusy { id: String },

    #[error("Queue is currently running")]
    QueueRunning,

    #[error("Drag event subscription failed: {message}")]
    Subscription { message: String },

    // Ambient errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl IngestError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        IngestError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a lookup error for a path.
    pub fn lookup(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        IngestError::Lookup {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the item processor records this error on the item instead of
    /// propagating it to the caller.
    pub fn is_item_failure(&self) -> bool {
        matches!(
            self,
            IngestError::Lookup { .. }
                | IngestError::Validation { .. }
                | IngestError::NotFound(_)
                | IngestError::IconResolution { .. }
                | IngestError::Creation(_)
        )
    }
}
