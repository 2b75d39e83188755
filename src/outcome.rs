//! Results handed back to the delivery layer.

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::LinkSanitizerError;

/// An album image written to the cache.
///
/// Once returned, the file belongs to the caller, who must delete it after use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedImage {
    /// Position of the image in the album manifest.
    pub index: usize,
    /// Where the image was downloaded from.
    pub source: Url,
    /// Where the image was stored.
    pub path: PathBuf,
}

/// What the engine fell back to after a recoverable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    /// Short-link expansion failed; the unexpanded URL was canonicalized.
    Unexpanded,
    /// Photo-album resolution failed; the post was treated as a plain link.
    NoAlbum,
}

/// A recoverable failure, kept for the caller to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    /// The URL token as written in the input.
    pub url: String,
    pub kind: FallbackKind,
    /// Rendered error message.
    pub reason: String,
}

impl Fallback {
    pub(crate) fn new(url: &str, kind: FallbackKind, error: &LinkSanitizerError) -> Self {
        Self {
            url: url.to_string(),
            kind,
            reason: error.to_string(),
        }
    }
}

/// Everything [`LinkSanitizer::sanitize`](crate::LinkSanitizer::sanitize) learned about one text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizationOutcome {
    /// The rewritten text, with the input's line and spacing structure.
    pub text: String,
    /// `true` if at least one URL was rewritten or an album was resolved.
    pub changed: bool,
    /// `true` if at least one photo album resolved to cached images.
    pub is_photo_album: bool,
    /// Cached album images, in encounter order and manifest order.
    pub cached_images: Vec<CachedImage>,
    /// Every URL token that parsed, in encounter order, as written in the input.
    pub original_urls: Vec<String>,
    /// Recoverable failures the engine worked around, in encounter order.
    pub fallbacks: Vec<Fallback>,
}

impl SanitizationOutcome {
    /// Outcome for text that is passed through without processing.
    pub fn untouched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    /// Paths of the cached images, in order.
    pub fn cached_image_paths(&self) -> impl Iterator<Item = &Path> {
        self.cached_images.iter().map(|image| image.path.as_path())
    }
}
