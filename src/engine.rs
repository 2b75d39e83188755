//! The text-level sanitizer.

use std::fmt;

use tokio::io::{AsyncRead, AsyncReadExt};
use url::Url;

use crate::album::PhotoAlbumResolver;
use crate::config::SanitizerBuilder;
use crate::error::{LinkSanitizerError, Result};
use crate::expand::{ShortLinkResolver, ShortLinkTriggers};
use crate::outcome::{Fallback, FallbackKind, SanitizationOutcome};
use crate::rewrite::{self, Canonical, RewritePipeline};
use crate::storage::FsImageStore;
use crate::text::{self, Piece};

/// Rewrites the URLs in free-form text.
///
/// Every whitespace-delimited word starting with `http://` or `https://` is
/// parsed, expanded if it is a short link, stripped of tracking parameters
/// and moved to an embed-friendly mirror where one applies. Photo-album posts
/// are additionally resolved into cached images.
///
/// A `LinkSanitizer` holds only read-only state and can be shared between
/// tasks (`&self` everywhere, `Send + Sync`).
///
/// # Example
///
/// ```rust,no_run
/// # async fn example() -> link_sanitizer::Result<()> {
/// let sanitizer = link_sanitizer::LinkSanitizer::builder().build()?;
/// let outcome = sanitizer
///     .sanitize("look https://example.com/a?utm_source=feed&id=7")
///     .await;
/// assert_eq!(outcome.text, "look https://example.com/a?id=7");
/// assert!(outcome.changed);
/// # Ok(())
/// # }
/// ```
pub struct LinkSanitizer {
    pipeline: RewritePipeline,
    triggers: ShortLinkTriggers,
    expander: ShortLinkResolver,
    albums: PhotoAlbumResolver<FsImageStore>,
    opt_out_marker: String,
}

impl fmt::Debug for LinkSanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkSanitizer")
            .field("triggers", &self.triggers)
            .field("cache_dir", &self.cache_dir())
            .field("opt_out_marker", &self.opt_out_marker)
            .finish_non_exhaustive()
    }
}

impl LinkSanitizer {
    pub(crate) fn new(
        pipeline: RewritePipeline,
        triggers: ShortLinkTriggers,
        expander: ShortLinkResolver,
        albums: PhotoAlbumResolver<FsImageStore>,
        opt_out_marker: String,
    ) -> Self {
        Self {
            pipeline,
            triggers,
            expander,
            albums,
            opt_out_marker,
        }
    }

    /// Start configuring a sanitizer.
    pub fn builder() -> SanitizerBuilder {
        SanitizerBuilder::new()
    }

    /// Directory album images are cached in.
    pub fn cache_dir(&self) -> &std::path::Path {
        self.albums.store().base_dir()
    }

    /// Sanitize every URL in `text`.
    ///
    /// Never fails: a URL that cannot be fully processed is kept in its
    /// original or partially sanitized form and the failure is recorded in
    /// [`SanitizationOutcome::fallbacks`]. Text containing the opt-out marker
    /// is returned untouched.
    pub async fn sanitize(&self, text: &str) -> SanitizationOutcome {
        if text::is_opted_out(text, &self.opt_out_marker) {
            return SanitizationOutcome::untouched(text);
        }

        let mut outcome = SanitizationOutcome::default();
        let mut paragraphs = Vec::new();
        for paragraph in text.split('\n') {
            let mut line = String::with_capacity(paragraph.len());
            for piece in text::pieces(paragraph) {
                match piece {
                    Piece::Space(run) => line.push_str(run),
                    Piece::Word(word) => line.push_str(&self.rewrite_word(word, &mut outcome).await),
                }
            }
            paragraphs.push(line);
        }
        outcome.text = paragraphs.join("\n");
        outcome
    }

    /// Read all of `reader` and sanitize it.
    ///
    /// Fails with [`LinkSanitizerError::Input`] if the input cannot be read
    /// or is not UTF-8; no partial output is produced in that case.
    pub async fn sanitize_reader<R>(&self, mut reader: R) -> Result<SanitizationOutcome>
    where
        R: AsyncRead + Unpin,
    {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .await
            .map_err(LinkSanitizerError::Input)?;
        Ok(self.sanitize(&text).await)
    }

    /// Canonicalize a single URL token without resolving photo albums.
    ///
    /// Returns `None` if the token does not parse as a URL. Expansion
    /// failures fall back to the unexpanded URL.
    pub async fn canonicalize(&self, token: &str) -> Option<Canonical> {
        let url = Url::parse(token).ok()?;
        let (canonical, _) = self.canonicalize_url(url).await;
        Some(canonical)
    }

    async fn canonicalize_url(&self, url: Url) -> (Canonical, Option<LinkSanitizerError>) {
        let (url, expanded, failure) = if self.triggers.matches(&url) {
            match self.expander.expand(&url).await {
                Ok(target) => {
                    let expanded = target != url;
                    (target, expanded, None)
                }
                Err(e) => (url, false, Some(e)),
            }
        } else {
            (url, false, None)
        };

        let mut canonical = rewrite::canonicalize(url, &self.pipeline);
        canonical.changed |= expanded;
        (canonical, failure)
    }

    async fn rewrite_word(&self, word: &str, outcome: &mut SanitizationOutcome) -> String {
        if !text::is_url_shaped(word) {
            return word.to_string();
        }
        let Ok(url) = Url::parse(word) else {
            return word.to_string();
        };
        outcome.original_urls.push(word.to_string());

        let (mut canonical, expand_failure) = self.canonicalize_url(url).await;
        if let Some(e) = expand_failure {
            outcome.fallbacks.push(Fallback::new(word, FallbackKind::Unexpanded, &e));
        }

        if canonical.photo_album {
            match self.albums.resolve(&canonical.url).await {
                Ok(images) => {
                    outcome.is_photo_album = true;
                    outcome.cached_images.extend(images);
                    canonical.changed = true;
                }
                Err(e) => {
                    outcome.fallbacks.push(Fallback::new(word, FallbackKind::NoAlbum, &e));
                }
            }
        }

        if canonical.changed {
            outcome.changed = true;
            canonical.url.into()
        } else {
            word.to_string()
        }
    }
}
