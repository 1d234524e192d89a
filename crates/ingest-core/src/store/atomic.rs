//! Crash-safe JSON persistence.
//!
//! Writes go to a uniquely named sibling temp file which is synced and then
//! renamed over the target, so readers only ever see a complete document.

use crate::error::{IngestError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

fn io_error(context: &str, path: &Path, source: std::io::Error) -> IngestError {
    IngestError::Io {
        message: format!("{} {}", context, path.display()),
        path: Some(path.to_path_buf()),
        source: Some(source),
    }
}

/// Path of the backup kept next to `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("json.bak")
}

/// Load a JSON document. A missing file is `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error("Failed to read", path, e)),
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| IngestError::Json {
            message: format!("Failed to parse {}: {}", path.display(), e),
            source: Some(e),
        })
}

/// Replace `path` with the JSON form of `data`.
///
/// With `keep_backup`, the previous contents are copied to
/// [`backup_path`] first; a failed backup is logged and does not abort the
/// write.
pub fn write_json<T: Serialize>(path: &Path, data: &T, keep_backup: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error("Failed to create directory", parent, e))?;
    }

    let serialized = serde_json::to_vec_pretty(data)?;
    let temp_path = path.with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4().simple()));

    let staged = stage(&temp_path, &serialized);
    if let Err(e) = staged {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    if keep_backup && path.exists() {
        let backup = backup_path(path);
        match fs::copy(path, &backup) {
            Ok(_) => debug!("Backed up {} to {}", path.display(), backup.display()),
            Err(e) => warn!("Failed to back up {}: {}", path.display(), e),
        }
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        io_error("Failed to replace", path, e)
    })?;

    debug!("Wrote {}", path.display());
    Ok(())
}

fn stage(temp_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)
        .map_err(|e| io_error("Failed to create", temp_path, e))?;

    file.write_all(bytes)
        .map_err(|e| io_error("Failed to write", temp_path, e))?;
    file.sync_all()
        .map_err(|e| io_error("Failed to sync", temp_path, e))
}
