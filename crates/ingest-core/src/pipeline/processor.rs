//! Single-item unit of work shared by the automatic and manual paths.
//!
//! Sequence: validate, confirm existence, resolve icon (advisory), derive the
//! shortcut name, create the shortcut. Every failure except the icon lookup
//! ends the item in `error` with the cause recorded on it.

use super::classifier::{shortcut_name, PathClassifier};
use super::icon::IconResolver;
use crate::collaborators::{Collaborators, IngestObserver, ShortcutSink};
use crate::config::IngestOptions;
use crate::error::{IngestError, Result};
use crate::models::{IconPayload, IngestItem, ItemStatus, ShortcutCreationInput, ShortcutRecord};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Drives one ingest item from `pending` to a terminal state.
pub struct ItemProcessor {
    classifier: PathClassifier,
    icons: IconResolver,
    shortcuts: Arc<dyn ShortcutSink>,
    category_id: Option<String>,
}

impl ItemProcessor {
    pub fn new(collaborators: &Collaborators, options: &IngestOptions) -> Self {
        Self {
            classifier: PathClassifier::new(collaborators.paths.clone()),
            icons: IconResolver::new(collaborators.icons.clone(), options.high_res_icons),
            shortcuts: collaborators.shortcuts.clone(),
            category_id: options.category_id.clone(),
        }
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    /// Classify `path` into a fresh pending item.
    pub async fn intake(&self, path: &Path) -> Result<IngestItem> {
        let descriptor = self.classifier.classify(path).await?;
        Ok(IngestItem::from_descriptor(descriptor))
    }

    /// Classify and process `path` in one go.
    ///
    /// A classification failure still produces an item, already in `error`.
    pub async fn process_path(
        &self,
        path: &Path,
        observer: &dyn IngestObserver,
    ) -> (IngestItem, bool) {
        match self.intake(path).await {
            Ok(mut item) => {
                let success = self.process(&mut item, observer).await;
                (item, success)
            }
            Err(e) => {
                debug!("Classification failed for {}: {}", path.display(), e);
                let item = IngestItem::unclassified(path, e.to_string());
                observer.on_item_updated(&item);
                (item, false)
            }
        }
    }

    /// Process `item` and report whether a shortcut was created.
    ///
    /// A pending item is flipped to `processing` (and observed) before any
    /// collaborator call; an item already in `processing` continues as is.
    pub async fn process(&self, item: &mut IngestItem, observer: &dyn IngestObserver) -> bool {
        match item.status {
            ItemStatus::Pending => {
                if let Err(e) = item.begin_processing() {
                    warn!("Cannot start item {}: {}", item.id, e);
                    return false;
                }
                observer.on_item_updated(item);
            }
            ItemStatus::Processing => {}
            status => {
                warn!("Item {} is already {}, not reprocessing", item.id, status);
                return status == ItemStatus::Success;
            }
        }

        let outcome = self.run_steps(item).await;

        let success = match outcome {
            Ok((record, icon)) => match item.mark_success(icon) {
                Ok(()) => {
                    observer.on_item_added(&item.path, &record);
                    true
                }
                Err(e) => {
                    warn!("Item {} finished out of order: {}", item.id, e);
                    false
                }
            },
            Err(e) => {
                debug!("Item {} failed: {}", item.path.display(), e);
                if let Err(transition) = item.mark_error(e.to_string()) {
                    warn!("Item {} finished out of order: {}", item.id, transition);
                }
                false
            }
        };

        observer.on_item_updated(item);
        success
    }

    async fn run_steps(&self, item: &IngestItem) -> Result<(ShortcutRecord, Option<IconPayload>)> {
        let descriptor = item.descriptor();

        if !self.classifier.validate(&descriptor).await? {
            return Err(IngestError::Validation {
                path: descriptor.path.clone(),
            });
        }

        self.classifier.confirm_exists(&descriptor).await?;

        let icon = self.icons.resolve_icon(&descriptor).await;

        let input = ShortcutCreationInput {
            name: shortcut_name(&descriptor),
            path: descriptor.path.clone(),
            category_id: self.category_id.clone(),
            icon_data: icon.clone(),
        };

        let record = self.shortcuts.create_shortcut(input).await?;
        debug!("Created shortcut {} for {}", record.id, descriptor.path.display());

        Ok((record, icon))
    }
}
