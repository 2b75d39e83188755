//! Builder for configuring a [`LinkSanitizer`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::album::{DEFAULT_MANIFEST_ENDPOINT, DEFAULT_MAX_CONCURRENT_DOWNLOADS, PhotoAlbumResolver};
use crate::engine::LinkSanitizer;
use crate::error::{LinkSanitizerError, Result};
use crate::expand::{ShortLinkResolver, ShortLinkTriggers};
use crate::rewrite::RewritePipeline;
use crate::rules::RuleTable;
use crate::storage::FsImageStore;

/// Substring that makes [`LinkSanitizer::sanitize`] leave a text alone.
pub const DEFAULT_OPT_OUT_MARKER: &str = "nocut";
/// Directory album images are cached in.
pub const DEFAULT_CACHE_DIR: &str = "image_cache";

/// Builder for configuring and creating a [`LinkSanitizer`].
///
/// Provides a fluent API for network timeouts, the image cache, the photo
/// manifest API, concurrency and the rule table.
///
/// # Example
///
/// ```rust,no_run
/// use link_sanitizer::SanitizerBuilder;
/// use std::time::Duration;
///
/// # fn example() -> link_sanitizer::Result<()> {
/// let sanitizer = SanitizerBuilder::new()
///     .timeout(Duration::from_secs(15))
///     .cache_dir("/var/cache/links")
///     .max_concurrent_downloads(4)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SanitizerBuilder {
    timeout: Duration,
    connect_timeout: Duration,
    max_redirects: usize,
    user_agent: String,
    cache_dir: PathBuf,
    manifest_endpoint: String,
    max_concurrent_downloads: usize,
    opt_out_marker: String,
    triggers: ShortLinkTriggers,
    rules: Arc<RuleTable>,
}

impl SanitizerBuilder {
    /// Create a new builder with sensible defaults.
    ///
    /// Defaults: 20 s request timeout, 10 s connect timeout, 10 redirects,
    /// cache in `image_cache`, 10 concurrent downloads, opt-out marker
    /// `nocut`, built-in rule table.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            connect_timeout: Duration::from_secs(10),
            max_redirects: 10,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            manifest_endpoint: DEFAULT_MANIFEST_ENDPOINT.to_string(),
            max_concurrent_downloads: DEFAULT_MAX_CONCURRENT_DOWNLOADS,
            opt_out_marker: DEFAULT_OPT_OUT_MARKER.to_string(),
            triggers: ShortLinkTriggers::default(),
            rules: RuleTable::shared(),
        }
    }

    /// Overall bound for one request: connect, redirects and body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Redirect hops followed before a request fails.
    pub fn max_redirects(mut self, hops: usize) -> Self {
        self.max_redirects = hops;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Directory album images are written to. Created on first use.
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Base URL of the photo manifest API.
    pub fn manifest_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.manifest_endpoint = endpoint.into();
        self
    }

    /// Maximum album images downloaded at the same time.
    pub fn max_concurrent_downloads(mut self, limit: usize) -> Self {
        self.max_concurrent_downloads = limit;
        self
    }

    /// Substring that disables processing for a whole text. Empty disables the check.
    pub fn opt_out_marker(mut self, marker: impl Into<String>) -> Self {
        self.opt_out_marker = marker.into();
        self
    }

    /// Add a host whose links are always expanded before canonicalization.
    pub fn short_link_host(mut self, host: impl Into<String>) -> Self {
        self.triggers.add_host(host);
        self
    }

    /// Replace the built-in rule table.
    pub fn rules(mut self, rules: impl Into<Arc<RuleTable>>) -> Self {
        self.rules = rules.into();
        self
    }

    /// Validate the configuration and create the [`LinkSanitizer`].
    pub fn build(self) -> Result<LinkSanitizer> {
        if self.max_concurrent_downloads == 0 {
            return Err(LinkSanitizerError::Config(
                "max_concurrent_downloads must be at least 1".into(),
            ));
        }
        let endpoint = Url::parse(&self.manifest_endpoint).map_err(|e| {
            LinkSanitizerError::Config(format!(
                "invalid manifest endpoint {:?}: {e}",
                self.manifest_endpoint
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(self.max_redirects))
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| LinkSanitizerError::Config(format!("HTTP client: {e}")))?;

        let albums = PhotoAlbumResolver::new(
            client.clone(),
            endpoint,
            FsImageStore::new(self.cache_dir),
            self.max_concurrent_downloads,
        );

        Ok(LinkSanitizer::new(
            RewritePipeline::standard(self.rules),
            self.triggers,
            ShortLinkResolver::new(client),
            albums,
            self.opt_out_marker,
        ))
    }
}

impl Default for SanitizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
