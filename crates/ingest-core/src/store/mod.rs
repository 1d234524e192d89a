//! JSON-file shortcut store.
//!
//! The whole document is kept in memory and rewritten atomically on every
//! change.

mod atomic;

pub use atomic::{backup_path, read_json, write_json};

use crate::collaborators::ShortcutSink;
use crate::config::StoreConfig;
use crate::error::{IngestError, Result};
use crate::models::{ShortcutCreationInput, ShortcutRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// On-disk layout of the store file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutDocument {
    pub version: String,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub shortcuts: Vec<ShortcutRecord>,
}

impl Default for ShortcutDocument {
    fn default() -> Self {
        Self {
            version: StoreConfig::DATA_VERSION.to_string(),
            last_updated: Utc::now(),
            shortcuts: Vec::new(),
        }
    }
}

/// Shortcut sink persisting to a single JSON file.
pub struct JsonShortcutStore {
    path: PathBuf,
    keep_backup: bool,
    document: Mutex<ShortcutDocument>,
}

impl JsonShortcutStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = read_json::<ShortcutDocument>(&path)?.unwrap_or_default();
        info!(
            "Opened shortcut store {} ({} shortcut(s))",
            path.display(),
            document.shortcuts.len()
        );

        Ok(Self {
            path,
            keep_backup: StoreConfig::KEEP_BACKUP,
            document: Mutex::new(document),
        })
    }

    pub fn with_backup(mut self, keep_backup: bool) -> Self {
        self.keep_backup = keep_backup;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored shortcuts in insertion order.
    pub fn list(&self) -> Vec<ShortcutRecord> {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .shortcuts
            .clone()
    }

    pub fn len(&self) -> usize {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .shortcuts
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ShortcutSink for JsonShortcutStore {
    async fn create_shortcut(&self, input: ShortcutCreationInput) -> Result<ShortcutRecord> {
        if input.name.trim().is_empty() {
            return Err(IngestError::Creation("Shortcut name is empty".to_string()));
        }
        if input.path.as_os_str().is_empty() {
            return Err(IngestError::Creation("Shortcut path is empty".to_string()));
        }

        let mut document = self.document.lock().unwrap_or_else(PoisonError::into_inner);

        let mut record = ShortcutRecord::from_input(input);
        record.sort_order = document.shortcuts.len() as i32;

        let mut updated = document.clone();
        updated.shortcuts.push(record.clone());
        updated.last_updated = record.created_at;

        write_json(&self.path, &updated, self.keep_backup)
            .map_err(|e| IngestError::Creation(format!("Failed to save shortcut: {}", e)))?;
        *document = updated;

        debug!("Stored shortcut {} ({})", record.name, record.id);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn input(name: &str, path: &str) -> ShortcutCreationInput {
        ShortcutCreationInput {
            name: name.to_string(),
            path: PathBuf::from(path),
            category_id: Some("default".to_string()),
            icon_data: None,
        }
    }

    #[tokio::test]
    async fn test_create_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shortcuts.json");

        let store = JsonShortcutStore::open(&path).unwrap();
        assert!(store.is_empty());

        let first = store.create_shortcut(input("a", "/tmp/a.txt")).await.unwrap();
        let second = store.create_shortcut(input("b", "/tmp/b")).await.unwrap();
        assert_eq!(first.sort_order, 0);
        assert_eq!(second.sort_order, 1);
        assert!(first.is_active);

        let reopened = JsonShortcutStore::open(&path).unwrap();
        assert_eq!(reopened.list(), vec![first, second]);

        let doc: ShortcutDocument = read_json(&path).unwrap().unwrap();
        assert_eq!(doc.version, StoreConfig::DATA_VERSION);
    }

    #[tokio::test]
    async fn test_rejects_empty_name() {
        let temp = TempDir::new().unwrap();
        let store = JsonShortcutStore::open(temp.path().join("s.json")).unwrap();

        let err = store.create_shortcut(input("  ", "/tmp/a")).await.unwrap_err();
        assert!(matches!(err, IngestError::Creation(_)));
        assert_eq!(err.to_string(), "Shortcut name is empty");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_empty_path() {
        let temp = TempDir::new().unwrap();
        let store = JsonShortcutStore::open(temp.path().join("s.json")).unwrap();

        let err = store.create_shortcut(input("a", "")).await.unwrap_err();
        assert_eq!(err.to_string(), "Shortcut path is empty");
    }

    #[tokio::test]
    async fn test_backup_toggle() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("s.json");
        let store = JsonShortcutStore::open(&path).unwrap().with_backup(false);

        store.create_shortcut(input("a", "/tmp/a")).await.unwrap();
        store.create_shortcut(input("b", "/tmp/b")).await.unwrap();
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn test_open_corrupt_file_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("s.json");
        std::fs::write(&path, "[").unwrap();

        assert!(JsonShortcutStore::open(&path).is_err());
    }
}
