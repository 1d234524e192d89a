//! Path classification and validation.
//!
//! Stateless wrappers over the `PathInspector` collaborator. Legality and
//! existence are checked separately so the two failures stay distinguishable.

use crate::collaborators::PathInspector;
use crate::error::{IngestError, Result};
use crate::models::PathDescriptor;
use std::path::Path;
use std::sync::Arc;

/// Classifies and validates paths through the path collaborator.
#[derive(Clone)]
pub struct PathClassifier {
    paths: Arc<dyn PathInspector>,
}

impl PathClassifier {
    pub fn new(paths: Arc<dyn PathInspector>) -> Self {
        Self { paths }
    }

    /// Determine whether `path` is a file or directory and its display name.
    ///
    /// Any collaborator failure is reported as `IngestError::Lookup`.
    pub async fn classify(&self, path: &Path) -> Result<PathDescriptor> {
        let info = self.paths.get_path_info(path).await.map_err(|e| match e {
            IngestError::Lookup { .. } => e,
            other => IngestError::lookup(path, other.to_string()),
        })?;

        Ok(PathDescriptor {
            path: path.to_path_buf(),
            is_directory: info.is_directory,
            display_name: info.display_name,
        })
    }

    /// Check legality with the rule set matching the descriptor's kind.
    pub async fn validate(&self, descriptor: &PathDescriptor) -> Result<bool> {
        if descriptor.is_directory {
            self.paths.validate_directory_path(&descriptor.path).await
        } else {
            self.paths.validate_file_path(&descriptor.path).await
        }
    }

    /// Fail with `IngestError::NotFound` unless the path exists right now.
    pub async fn confirm_exists(&self, descriptor: &PathDescriptor) -> Result<()> {
        if self.paths.check_exists(&descriptor.path).await? {
            Ok(())
        } else {
            Err(IngestError::NotFound(descriptor.path.clone()))
        }
    }
}

/// Name for the shortcut created from `descriptor`.
///
/// Files lose their final extension (`report.final.pdf` becomes
/// `report.final`); directories keep their name. A leading dot is not an
/// extension separator, so `.bashrc` is left alone.
pub fn shortcut_name(descriptor: &PathDescriptor) -> String {
    if descriptor.is_directory {
        return descriptor.display_name.clone();
    }

    match descriptor.display_name.rfind('.') {
        Some(idx) if idx > 0 => descriptor.display_name[..idx].to_string(),
        _ => descriptor.display_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::PathInfo;
    use async_trait::async_trait;
    use std::path::PathBuf;

    struct Inspector;

    #[async_trait]
    impl PathInspector for Inspector {
        async fn get_path_info(&self, path: &Path) -> Result<PathInfo> {
            if path.as_os_str().is_empty() {
                return Err(IngestError::Other("empty".into()));
            }
            Ok(PathInfo {
                display_name: path.file_name().unwrap().to_string_lossy().to_string(),
                is_directory: path.to_string_lossy().ends_with("dir"),
            })
        }

        async fn validate_file_path(&self, path: &Path) -> Result<bool> {
            Ok(!path.to_string_lossy().contains('|'))
        }

        async fn validate_directory_path(&self, _path: &Path) -> Result<bool> {
            // Distinguishable from the file rule.
            Ok(false)
        }

        async fn check_exists(&self, path: &Path) -> Result<bool> {
            Ok(!path.starts_with("/missing"))
        }
    }

    fn classifier() -> PathClassifier {
        PathClassifier::new(Arc::new(Inspector))
    }

    fn descriptor(name: &str, is_directory: bool) -> PathDescriptor {
        PathDescriptor {
            path: PathBuf::from("/tmp").join(name),
            is_directory,
            display_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_classify() {
        let d = classifier().classify(Path::new("/tmp/a.txt")).await.unwrap();
        assert_eq!(d.display_name, "a.txt");
        assert!(!d.is_directory);

        let d = classifier().classify(Path::new("/tmp/somedir")).await.unwrap();
        assert!(d.is_directory);
    }

    #[tokio::test]
    async fn test_classify_failure_is_lookup() {
        let err = classifier().classify(Path::new("")).await.unwrap_err();
        assert!(matches!(err, IngestError::Lookup { .. }));
    }

    #[tokio::test]
    async fn test_validate_uses_kind_specific_rule() {
        let c = classifier();
        assert!(c.validate(&descriptor("a.txt", false)).await.unwrap());
        assert!(!c.validate(&descriptor("a.txt", true)).await.unwrap());
    }

    #[tokio::test]
    async fn test_confirm_exists() {
        let c = classifier();
        let missing = PathDescriptor {
            path: PathBuf::from("/missing/b"),
            is_directory: false,
            display_name: "b".into(),
        };
        let err = c.confirm_exists(&missing).await.unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
        assert!(c.confirm_exists(&descriptor("a.txt", false)).await.is_ok());
    }

    #[test]
    fn test_shortcut_name() {
        assert_eq!(shortcut_name(&descriptor("a.txt", false)), "a");
        assert_eq!(shortcut_name(&descriptor("archive.tar.gz", false)), "archive.tar");
        assert_eq!(shortcut_name(&descriptor("Makefile", false)), "Makefile");
        assert_eq!(shortcut_name(&descriptor(".bashrc", false)), ".bashrc");
        assert_eq!(shortcut_name(&descriptor("my.project", true)), "my.project");
    }
}
