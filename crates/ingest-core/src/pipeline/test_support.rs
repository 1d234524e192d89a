//! In-memory collaborators shared by the pipeline unit tests.

use crate::collaborators::{
    Collaborators, FileDialog, IconSource, IngestObserver, PathInfo, PathInspector, ShortcutSink,
};
use crate::error::{IngestError, Result};
use crate::models::{
    BatchSummary, IconPayload, IngestItem, ItemStatus, Notice, ShortcutCreationInput,
    ShortcutRecord,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fake filesystem + icon source + shortcut sink.
///
/// Unknown paths classify as files that do not exist; paths containing
/// `unreadable` fail classification; paths containing `|` are illegal.
#[derive(Default)]
pub(crate) struct FakeBackend {
    entries: HashMap<PathBuf, bool>,
    broken_icons: bool,
    rejections: HashMap<String, String>,
    create_latency: Duration,
    created: Mutex<Vec<ShortcutCreationInput>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_file(mut self, path: &str) -> Self {
        self.entries.insert(PathBuf::from(path), false);
        self
    }

    pub(crate) fn with_dir(mut self, path: &str) -> Self {
        self.entries.insert(PathBuf::from(path), true);
        self
    }

    pub(crate) fn with_broken_icons(mut self) -> Self {
        self.broken_icons = true;
        self
    }

    pub(crate) fn rejecting(mut self, name: &str, message: &str) -> Self {
        self.rejections.insert(name.to_string(), message.to_string());
        self
    }

    pub(crate) fn with_create_latency(mut self, latency: Duration) -> Self {
        self.create_latency = latency;
        self
    }

    pub(crate) fn collaborators(self: &Arc<Self>) -> Collaborators {
        Collaborators::new(self.clone(), self.clone(), self.clone())
    }

    pub(crate) fn created(&self) -> Vec<ShortcutCreationInput> {
        self.created.lock().unwrap().clone()
    }

    pub(crate) fn created_paths(&self) -> Vec<PathBuf> {
        self.created().into_iter().map(|c| c.path).collect()
    }
}

#[async_trait]
impl PathInspector for FakeBackend {
    async fn get_path_info(&self, path: &Path) -> Result<PathInfo> {
        if path.to_string_lossy().contains("unreadable") {
            return Err(IngestError::lookup(path, "permission denied"));
        }
        Ok(PathInfo {
            display_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            is_directory: self.entries.get(path).copied().unwrap_or(false),
        })
    }

    async fn validate_file_path(&self, path: &Path) -> Result<bool> {
        Ok(!path.to_string_lossy().contains('|'))
    }

    async fn validate_directory_path(&self, path: &Path) -> Result<bool> {
        Ok(!path.to_string_lossy().contains('|'))
    }

    async fn check_exists(&self, path: &Path) -> Result<bool> {
        Ok(self.entries.contains_key(path))
    }
}

#[async_trait]
impl IconSource for FakeBackend {
    async fn get_file_icon(&self, path: &Path, _high_res: bool) -> Result<Option<IconPayload>> {
        if self.broken_icons {
            return Err(IngestError::Other(format!("no icon for {}", path.display())));
        }
        Ok(Some(IconPayload {
            data: "ZmlsZQ==".into(),
            format: "png".into(),
            from_cache: false,
        }))
    }

    async fn get_directory_icon(
        &self,
        path: &Path,
        high_res: bool,
    ) -> Result<Option<IconPayload>> {
        self.get_file_icon(path, high_res).await
    }
}

#[async_trait]
impl ShortcutSink for FakeBackend {
    async fn create_shortcut(&self, input: ShortcutCreationInput) -> Result<ShortcutRecord> {
        if !self.create_latency.is_zero() {
            tokio::time::sleep(self.create_latency).await;
        }
        if let Some(message) = self.rejections.get(&input.name) {
            return Err(IngestError::Creation(message.clone()));
        }
        self.created.lock().unwrap().push(input.clone());
        Ok(ShortcutRecord::from_input(input))
    }
}

/// Dialog returning a scripted sequence of answers.
#[derive(Default)]
pub(crate) struct ScriptedDialog {
    answers: Mutex<VecDeque<Option<PathBuf>>>,
}

impl ScriptedDialog {
    pub(crate) fn new(answers: Vec<Option<&str>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().map(|a| a.map(PathBuf::from)).collect()),
        }
    }
}

#[async_trait]
impl FileDialog for ScriptedDialog {
    async fn open_file_dialog(&self) -> Result<Option<PathBuf>> {
        Ok(self.answers.lock().unwrap().pop_front().flatten())
    }
}

/// Observer that records every callback.
#[derive(Default)]
pub(crate) struct RecordingObserver {
    updates: Mutex<Vec<IngestItem>>,
    added: Mutex<Vec<PathBuf>>,
    notices: Mutex<Vec<Notice>>,
    completions: Mutex<Vec<BatchSummary>>,
}

impl RecordingObserver {
    pub(crate) fn statuses(&self) -> Vec<ItemStatus> {
        self.updates.lock().unwrap().iter().map(|i| i.status).collect()
    }

    pub(crate) fn updates(&self) -> Vec<IngestItem> {
        self.updates.lock().unwrap().clone()
    }

    pub(crate) fn added(&self) -> Vec<PathBuf> {
        self.added.lock().unwrap().clone()
    }

    pub(crate) fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub(crate) fn completions(&self) -> Vec<BatchSummary> {
        self.completions.lock().unwrap().clone()
    }
}

impl IngestObserver for RecordingObserver {
    fn on_item_updated(&self, item: &IngestItem) {
        self.updates.lock().unwrap().push(item.clone());
    }

    fn on_item_added(&self, path: &Path, _record: &ShortcutRecord) {
        self.added.lock().unwrap().push(path.to_path_buf());
    }

    fn on_notice(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }

    fn on_batch_complete(&self, summary: &BatchSummary) {
        self.completions.lock().unwrap().push(*summary);
    }
}
