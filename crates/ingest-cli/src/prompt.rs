//! Terminal stand-in for a native file picker.

use async_trait::async_trait;
use shortcut_ingest::{FileDialog, IngestError, Result};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Asks for a path on stderr and reads it from stdin. An empty line or EOF
/// counts as cancelling.
pub struct PromptDialog {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl PromptDialog {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

#[async_trait]
impl FileDialog for PromptDialog {
    async fn open_file_dialog(&self) -> Result<Option<PathBuf>> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(b"Path to add (empty to cancel): ").await?;
        stderr.flush().await?;

        let line = self
            .lines
            .lock()
            .await
            .next_line()
            .await
            .map_err(|e| IngestError::Other(format!("Failed to read path: {}", e)))?;

        Ok(line
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .map(PathBuf::from))
    }
}
