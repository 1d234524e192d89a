//! Best-effort icon resolution.

use crate::collaborators::IconSource;
use crate::error::IngestError;
use crate::models::{IconPayload, PathDescriptor};
use std::sync::Arc;
use tracing::debug;

/// Picks the file or directory icon call and swallows every failure.
///
/// No caching here; that belongs to the icon source.
#[derive(Clone)]
pub struct IconResolver {
    icons: Arc<dyn IconSource>,
    high_res: bool,
}

impl IconResolver {
    pub fn new(icons: Arc<dyn IconSource>, high_res: bool) -> Self {
        Self { icons, high_res }
    }

    pub async fn resolve_icon(&self, descriptor: &PathDescriptor) -> Option<IconPayload> {
        let result = if descriptor.is_directory {
            self.icons
                .get_directory_icon(&descriptor.path, self.high_res)
                .await
        } else {
            self.icons.get_file_icon(&descriptor.path, self.high_res).await
        };

        match result {
            Ok(icon) => icon,
            Err(e) => {
                let err = IngestError::IconResolution {
                    path: descriptor.path.clone(),
                    message: e.to_string(),
                };
                debug!("{}; continuing without icon", err);
                None
            }
        }
    }
}
