//! # link_sanitizer
//!
//! Rewrites the URLs found in free-form text: strips tracking query
//! parameters, expands short links, moves links to embed-friendly mirrors and
//! resolves TikTok photo posts into locally cached images.
//!
//! ## Overview
//!
//! A [`LinkSanitizer`] splits text into paragraphs and words, sends every
//! URL-shaped word through a [`RewritePipeline`] of pure [`UrlRewrite`]
//! stages and reassembles the text with its original spacing. The tracking
//! parameters come from an immutable [`RuleTable`]; photo posts go through
//! a [`PhotoAlbumResolver`] that downloads images into an [`ImageStore`]
//! with bounded concurrency.
//!
//! Failures local to one URL never abort the rest of the text: the URL is
//! kept in its best-effort form and the failure is listed in
//! [`SanitizationOutcome::fallbacks`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use link_sanitizer::SanitizerBuilder;
//!
//! # async fn example() -> link_sanitizer::Result<()> {
//! let sanitizer = SanitizerBuilder::new().cache_dir("/tmp/link-images").build()?;
//!
//! let outcome = sanitizer
//!     .sanitize("https://x.com/rustlang/status/1?s=20 and https://youtu.be/abc?si=xyz")
//!     .await;
//! assert_eq!(
//!     outcome.text,
//!     "https://fixupx.com/rustlang/status/1 and https://youtu.be/abc"
//! );
//!
//! // Album images belong to the caller once returned.
//! for path in outcome.cached_image_paths() {
//!     let _ = tokio::fs::remove_file(path).await;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `rustls-tls` | **yes** | Use `rustls` for HTTPS. |
//! | `native-tls` | no | Use the platform TLS stack instead. |
//! | `cli` | **yes** | Builds the `link-sanitizer` binary. |

pub mod album;
pub mod config;
pub mod engine;
pub mod error;
pub mod expand;
pub mod outcome;
pub mod rewrite;
pub mod rules;
pub mod storage;
pub mod text;
mod worker;

pub use album::PhotoAlbumResolver;
pub use config::SanitizerBuilder;
pub use engine::LinkSanitizer;
pub use error::{LinkSanitizerError, Result};
pub use expand::{ShortLinkResolver, ShortLinkTriggers};
pub use outcome::{CachedImage, Fallback, FallbackKind, SanitizationOutcome};
pub use rewrite::{
    Canonical, InstagramRewrite, RewritePipeline, StripTrackingParams, TikTokLiveQuery,
    TikTokMirror, UrlRewrite, XMirror,
};
pub use rules::{DomainGlob, DomainRuleSet, Rule, RuleTable};
pub use storage::{FsImageStore, ImageStore};

use std::sync::OnceLock;

// Global state for the optional singleton pattern
static GLOBAL: OnceLock<LinkSanitizer> = OnceLock::new();

/// Build the global [`LinkSanitizer`] singleton.
///
/// Call once at application startup; afterwards any part of the application
/// can reach the same instance through [`global()`].
///
/// Returns [`LinkSanitizerError::AlreadyInitialized`] if called more than once.
pub fn init(builder: SanitizerBuilder) -> Result<&'static LinkSanitizer> {
    let sanitizer = builder.build()?;
    GLOBAL
        .set(sanitizer)
        .map_err(|_| LinkSanitizerError::AlreadyInitialized)?;
    GLOBAL.get().ok_or(LinkSanitizerError::AlreadyInitialized)
}

/// Retrieve the global [`LinkSanitizer`] previously registered with [`init()`].
///
/// Returns `None` if [`init()`] has not been called.
pub fn global() -> Option<&'static LinkSanitizer> {
    GLOBAL.get()
}
