use std::path::{Component, Path, PathBuf};

use futures_util::future::BoxFuture;
use tracing::debug;

use super::TemplateSource;
use crate::error::TemplateError;

/// Fragments read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirTemplates {
    root: PathBuf,
}

impl DirTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a fragment name below the root, refusing anything that would
    /// escape it.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl TemplateSource for DirTemplates {
    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }

    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<String, TemplateError>> {
        Box::pin(async move {
            let path = self
                .resolve(name)
                .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
            debug!("Reading template {:?}", path);

            match tokio::fs::read_to_string(&path).await {
                Ok(body) => Ok(body),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(TemplateError::NotFound(name.to_string()))
                }
                Err(source) => Err(TemplateError::Io {
                    name: name.to_string(),
                    source,
                }),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_fragment_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("footer.html"), "<footer/>").unwrap();

        let templates = DirTemplates::new(temp_dir.path());
        assert_eq!(templates.fetch("footer.html").await.unwrap(), "<footer/>");
    }

    #[tokio::test]
    async fn test_missing_fragment_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let templates = DirTemplates::new(temp_dir.path());
        assert!(matches!(
            templates.fetch("nope.html").await,
            Err(TemplateError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_parent_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let templates = DirTemplates::new(temp_dir.path().join("partials"));
        assert!(matches!(
            templates.fetch("../secret.html").await,
            Err(TemplateError::NotFound(_))
        ));
    }
}
