//! Centralized configuration for the ingestion pipeline.
//!
//! Compile-time defaults live on the unit structs below; `IngestOptions`
//! carries the values that may be tuned at runtime.

use crate::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Pipeline timing and policy defaults.
pub struct PipelineConfig;

impl PipelineConfig {
    /// Quiet period after the last drop notification before a batch starts.
    pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);
    /// Pause between items of a manual queue run.
    pub const INTER_ITEM_DELAY: Duration = Duration::from_millis(100);
    pub const HIGH_RES_ICONS: bool = true;
    pub const DEFAULT_CATEGORY_ID: &'static str = "default";
    /// Buffer for per-subscriber drag event channels.
    pub const DRAG_EVENT_BUFFER: usize = 64;
}

/// Icon cache configuration used by the local icon source.
pub struct IconCacheConfig;

impl IconCacheConfig {
    pub const TTL: Duration = Duration::from_secs(3600);
    pub const MAX_ENTRIES: u64 = 1000;
}

/// Shortcut store configuration.
pub struct StoreConfig;

impl StoreConfig {
    pub const APP_DIR_NAME: &'static str = "shortcut-ingest";
    pub const FILE_NAME: &'static str = "shortcuts.json";
    pub const KEEP_BACKUP: bool = true;
    pub const DATA_VERSION: &'static str = "1.0.0";
}

/// Runtime-tunable options.
///
/// Every field may be omitted from a config file; missing fields fall back
/// to the `PipelineConfig` defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Debounce window for drop dispatches, in milliseconds.
    pub debounce_ms: u64,
    /// Delay between manual queue items, in milliseconds.
    pub inter_item_delay_ms: u64,
    /// Request high resolution icons from the icon source.
    pub high_res_icons: bool,
    /// Category assigned to created shortcuts.
    pub category_id: Option<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            debounce_ms: PipelineConfig::DEBOUNCE_WINDOW.as_millis() as u64,
            inter_item_delay_ms: PipelineConfig::INTER_ITEM_DELAY.as_millis() as u64,
            high_res_icons: PipelineConfig::HIGH_RES_ICONS,
            category_id: Some(PipelineConfig::DEFAULT_CATEGORY_ID.to_string()),
        }
    }
}

impl IngestOptions {
    /// Load options from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(path).map_err(|e| IngestError::io_with_path(e, path))?;
        serde_json::from_str(&contents).map_err(|e| IngestError::Config {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn inter_item_delay(&self) -> Duration {
        Duration::from_millis(self.inter_item_delay_ms)
    }
}
