//! Filesystem image cache.

use std::path::PathBuf;

use crate::error::{LinkSanitizerError, Result};
use crate::storage::ImageStore;

/// Store that writes images into a local cache directory.
///
/// The directory is created on first write. Files are never removed by the
/// store: whoever receives the returned paths owns them.
///
/// # Example
///
/// ```rust,no_run
/// use link_sanitizer::FsImageStore;
///
/// let store = FsImageStore::new("image_cache");
/// ```
#[derive(Debug, Clone)]
pub struct FsImageStore {
    base_dir: PathBuf,
}

impl FsImageStore {
    /// Create a new `FsImageStore` rooted at the given directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &std::path::Path {
        &self.base_dir
    }
}

impl ImageStore for FsImageStore {
    async fn put(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(LinkSanitizerError::CacheWrite)?;

        let path = self.base_dir.join(name);
        tokio::fs::write(&path, content)
            .await
            .map_err(LinkSanitizerError::CacheWrite)?;

        tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_cache_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = FsImageStore::new(tmp.path().join("nested/cache"));

        let path = store.put("1_abc.jpg", b"\xff\xd8\xff").await.unwrap();

        assert_eq!(path, tmp.path().join("nested/cache/1_abc.jpg"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"\xff\xd8\xff");
    }

    #[tokio::test]
    async fn unwritable_location_is_a_cache_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        tokio::fs::write(&blocker, b"file").await.unwrap();

        let store = FsImageStore::new(&blocker);
        let err = store.put("x.jpg", b"data").await.unwrap_err();
        assert!(matches!(err, LinkSanitizerError::CacheWrite(_)));
        assert!(err.is_recoverable());
    }
}
