//! Pluggable storage for downloaded album images.
//!
//! The crate ships with [`FsImageStore`], which writes into a local cache
//! directory. Implement the [`ImageStore`] trait to put images elsewhere.
//!
//! Files are named with [`cache_file_name`]: a creation timestamp, a hash of
//! the source URL and the source extension, so concurrent requests for the
//! same image never collide and every file stays traceable to its origin.

mod fs;

pub use fs::FsImageStore;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use url::Url;

use crate::error::Result;

/// Extension used when the source URL path has none.
pub const DEFAULT_EXTENSION: &str = "jpg";
/// Number of hex digits of the URL hash kept in file names.
const HASH_PREFIX_LEN: usize = 16;

/// Trait for backends that persist downloaded images.
///
/// Implementations must be `Send + Sync + 'static` so one store can serve
/// concurrent downloads.
///
/// # Implementing a custom backend
///
/// ```rust,no_run
/// use std::path::PathBuf;
/// use link_sanitizer::{ImageStore, Result};
///
/// struct NullStore;
///
/// impl ImageStore for NullStore {
///     async fn put(&self, name: &str, _content: &[u8]) -> Result<PathBuf> {
///         Ok(PathBuf::from("/dev/null").join(name))
///     }
/// }
/// ```
pub trait ImageStore: Send + Sync + 'static {
    /// Persist `content` under `name` and return the path of the stored file.
    fn put(&self, name: &str, content: &[u8]) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// Build the cache file name for an image downloaded from `source`.
///
/// Format: `<unix-nanos>_<16 hex digits of sha256(source)>.<ext>`.
pub fn cache_file_name(source: &Url) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let digest = hex::encode(Sha256::digest(source.as_str().as_bytes()));
    format!(
        "{nanos}_{}.{}",
        &digest[..HASH_PREFIX_LEN],
        extension_of(source)
    )
}

fn extension_of(source: &Url) -> &str {
    Path::new(source.path())
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .unwrap_or(DEFAULT_EXTENSION)
}
