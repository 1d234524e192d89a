//! TTL cache in front of any icon source.

use crate::collaborators::IconSource;
use crate::config::IconCacheConfig;
use crate::error::Result;
use crate::models::IconPayload;
use async_trait::async_trait;
use mini_moka::sync::Cache;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};
use tracing::debug;

/// Caches icons per path, resolution and modification time.
///
/// A modified file gets a new key, so stale icons are never served for it.
/// Paths whose metadata cannot be read bypass the cache.
pub struct CachedIconSource {
    inner: Arc<dyn IconSource>,
    cache: Cache<String, IconPayload>,
}

impl CachedIconSource {
    /// Create a cache using the default TTL and capacity.
    pub fn new(inner: Arc<dyn IconSource>) -> Self {
        Self::with_settings(inner, IconCacheConfig::TTL, IconCacheConfig::MAX_ENTRIES)
    }

    pub fn with_settings(inner: Arc<dyn IconSource>, ttl: Duration, max_entries: u64) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_entries)
                .build(),
        }
    }

    /// Drop every cached icon.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    async fn lookup(
        &self,
        path: &Path,
        high_res: bool,
        is_directory: bool,
    ) -> Result<Option<IconPayload>> {
        let key = modified_secs(path)
            .await
            .map(|mtime| format!("{}|{}|{}", path.display(), high_res, mtime));

        if let Some(hit) = key.as_ref().and_then(|k| self.cache.get(k)) {
            debug!("Icon cache hit for {}", path.display());
            return Ok(Some(IconPayload {
                from_cache: true,
                ..hit
            }));
        }

        let icon = if is_directory {
            self.inner.get_directory_icon(path, high_res).await?
        } else {
            self.inner.get_file_icon(path, high_res).await?
        };

        if let (Some(key), Some(icon)) = (key, icon.as_ref()) {
            self.cache.insert(key, icon.clone());
        }
        Ok(icon)
    }
}

#[async_trait]
impl IconSource for CachedIconSource {
    async fn get_file_icon(&self, path: &Path, high_res: bool) -> Result<Option<IconPayload>> {
        self.lookup(path, high_res, false).await
    }

    async fn get_directory_icon(
        &self,
        path: &Path,
        high_res: bool,
    ) -> Result<Option<IconPayload>> {
        self.lookup(path, high_res, true).await
    }
}

async fn modified_secs(path: &Path) -> Option<u64> {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    let modified = metadata.modified().ok()?;
    modified
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}
