//! Local filesystem implementation of path inspection and default icons.

use crate::collaborators::{IconSource, PathInfo, PathInspector};
use crate::error::{IngestError, Result};
use crate::models::IconPayload;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Characters rejected anywhere in a path under Windows rules.
const WINDOWS_INVALID_CHARS: [char; 6] = ['<', '>', '"', '|', '?', '*'];

/// Matches a leading `X:` drive designator.
static DRIVE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.):").expect("drive prefix regex must compile"));

/// Path inspector and icon source backed by the local filesystem.
///
/// Legality checks are purely lexical; existence is only checked by
/// [`check_exists`](PathInspector::check_exists). Windows rules apply on
/// Windows by default and can be forced with [`LocalFs::with_windows_rules`].
#[derive(Debug, Clone)]
pub struct LocalFs {
    windows_rules: bool,
}

impl Default for LocalFs {
    fn default() -> Self {
        Self {
            windows_rules: cfg!(windows),
        }
    }
}

impl LocalFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_windows_rules(mut self, enabled: bool) -> Self {
        self.windows_rules = enabled;
        self
    }

    /// Lexical legality check shared by files and directories.
    fn check_legal(&self, path: &Path) -> std::result::Result<(), String> {
        let raw = path.to_string_lossy();

        if raw.is_empty() {
            return Err("path is empty".to_string());
        }
        if raw.contains('\0') {
            return Err("path contains a NUL byte".to_string());
        }

        if self.windows_rules {
            if let Some(ch) = raw.chars().find(|c| WINDOWS_INVALID_CHARS.contains(c)) {
                return Err(format!("path contains invalid character: {}", ch));
            }
            if let Some(caps) = DRIVE_PREFIX.captures(&raw) {
                let letter = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                if !letter.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err("invalid drive letter in path".to_string());
                }
            }
        }

        Ok(())
    }

    fn ends_with_separator(&self, path: &Path) -> bool {
        let raw = path.to_string_lossy();
        raw.ends_with('/') || (self.windows_rules && raw.ends_with('\\'))
    }
}

#[async_trait]
impl PathInspector for LocalFs {
    async fn get_path_info(&self, path: &Path) -> Result<PathInfo> {
        if path.as_os_str().is_empty() {
            return Err(IngestError::lookup(path, "Path is empty"));
        }

        let is_directory = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata.is_dir(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                return Err(IngestError::lookup(
                    path,
                    format!("Failed to get metadata: {}", e),
                ))
            }
        };

        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(PathInfo {
            display_name,
            is_directory,
        })
    }

    async fn validate_file_path(&self, path: &Path) -> Result<bool> {
        let verdict = self.check_legal(path).and_then(|()| {
            if self.ends_with_separator(path) {
                Err("file path ends with a separator".to_string())
            } else {
                Ok(())
            }
        });

        match verdict {
            Ok(()) => Ok(true),
            Err(reason) => {
                debug!("Rejected file path {}: {}", path.display(), reason);
                Ok(false)
            }
        }
    }

    async fn validate_directory_path(&self, path: &Path) -> Result<bool> {
        match self.check_legal(path) {
            Ok(()) => Ok(true),
            Err(reason) => {
                debug!("Rejected directory path {}: {}", path.display(), reason);
                Ok(false)
            }
        }
    }

    async fn check_exists(&self, path: &Path) -> Result<bool> {
        tokio::fs::try_exists(path)
            .await
            .map_err(|e| IngestError::io_with_path(e, path))
    }
}

#[async_trait]
impl IconSource for LocalFs {
    async fn get_file_icon(&self, path: &Path, _high_res: bool) -> Result<Option<IconPayload>> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");
        Ok(Some(text_icon(default_icon_for_extension(extension))))
    }

    async fn get_directory_icon(
        &self,
        _path: &Path,
        _high_res: bool,
    ) -> Result<Option<IconPayload>> {
        Ok(Some(text_icon(FOLDER_ICON)))
    }
}

const FOLDER_ICON: &str = "📁";

/// Glyph used as the icon for a file with the given extension.
pub fn default_icon_for_extension(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "exe" | "msi" => "⚙️",
        "txt" | "md" | "doc" | "docx" => "📄",
        "pdf" => "📕",
        "jpg" | "jpeg" | "png" | "gif" | "bmp" => "🖼️",
        "mp3" | "wav" | "flac" | "aac" => "🎵",
        "mp4" | "avi" | "mkv" | "mov" => "🎬",
        "zip" | "rar" | "7z" | "tar" => "📦",
        "html" | "htm" => "🌐",
        "js" | "ts" | "py" | "rs" | "cpp" | "c" => "💻",
        _ => FOLDER_ICON,
    }
}

fn text_icon(glyph: &str) -> IconPayload {
    IconPayload {
        data: general_purpose::STANDARD.encode(glyph.as_bytes()),
        format: "text".to_string(),
        from_cache: false,
    }
}
