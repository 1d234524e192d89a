//! Shortcut payloads exchanged with the persistence collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Icon data returned by an icon source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconPayload {
    /// Base64 encoded icon bytes.
    pub data: String,
    /// Format of the decoded bytes (`png`, `text`, ...).
    pub format: String,
    #[serde(default)]
    pub from_cache: bool,
}

/// Payload handed to the shortcut collaborator once an item passes validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutCreationInput {
    pub name: String,
    pub path: PathBuf,
    pub category_id: Option<String>,
    pub icon_data: Option<IconPayload>,
}

/// A persisted shortcut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutRecord {
    pub id: String,
    pub name: String,
    pub file_path: PathBuf,
    #[serde(default)]
    pub icon_data: Option<IconPayload>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub usage_count: u32,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl ShortcutRecord {
    /// Build a fresh record from a creation payload.
    pub fn from_input(input: ShortcutCreationInput) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name,
            file_path: input.path,
            icon_data: input.icon_data,
            category_id: input.category_id,
            usage_count: 0,
            sort_order: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
