//! Short-link expansion.
//!
//! Short links are resolved with a `HEAD` request that follows redirects;
//! the body is never fetched. Callers treat every failure as recoverable and
//! keep the unexpanded URL.

use std::collections::BTreeSet;

use url::Url;

use crate::error::{LinkSanitizerError, Result};
use crate::rewrite::{LIVE_SEGMENT, PHOTO_SEGMENT};

/// Hosts that only ever serve redirects.
const SHORT_HOSTS: &[&str] = &["vm.tiktok.com", "vt.tiktok.com"];
/// Canonical hosts that redirect unless the path already names a post.
const AMBIGUOUS_HOSTS: &[&str] = &["tiktok.com", "www.tiktok.com"];
/// Path markers of direct posts on the ambiguous hosts.
const DIRECT_POST_MARKERS: &[&str] = &["/video/", PHOTO_SEGMENT, LIVE_SEGMENT];

/// Decides which URLs go through the [`ShortLinkResolver`].
#[derive(Debug, Clone)]
pub struct ShortLinkTriggers {
    always: BTreeSet<String>,
}

impl ShortLinkTriggers {
    /// Add a host (exact match) whose links are always expanded.
    pub fn add_host(&mut self, host: impl Into<String>) {
        self.always.insert(host.into().to_ascii_lowercase());
    }

    /// Returns `true` if `url` should be expanded before canonicalization.
    pub fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        if self.always.contains(host) {
            return true;
        }
        AMBIGUOUS_HOSTS.contains(&host)
            && !DIRECT_POST_MARKERS
                .iter()
                .any(|marker| url.path().contains(marker))
    }
}

impl Default for ShortLinkTriggers {
    fn default() -> Self {
        Self {
            always: SHORT_HOSTS.iter().map(|h| (*h).to_string()).collect(),
        }
    }
}

/// Resolves redirecting URLs to their final destination.
#[derive(Debug, Clone)]
pub struct ShortLinkResolver {
    client: reqwest::Client,
}

impl ShortLinkResolver {
    /// Create a resolver on top of a configured client.
    ///
    /// The client's redirect policy and timeout bound the probe.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Follow redirects from `url` and return where they end.
    pub async fn expand(&self, url: &Url) -> Result<Url> {
        let response = self.client.head(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LinkSanitizerError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        tracing::debug!(from = %url, to = %response.url(), "Expanded short link");
        Ok(response.url().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triggers(input: &str) -> bool {
        ShortLinkTriggers::default().matches(&Url::parse(input).unwrap())
    }

    #[test]
    fn short_hosts_always_trigger() {
        assert!(triggers("https://vm.tiktok.com/ZMabc/"));
        assert!(triggers("https://vt.tiktok.com/ZSxyz/"));
    }

    #[test]
    fn canonical_host_triggers_without_direct_post_path() {
        assert!(triggers("https://www.tiktok.com/t/ZT8abc/"));
        assert!(triggers("https://tiktok.com/ZT8abc"));
    }

    #[test]
    fn direct_posts_do_not_trigger() {
        assert!(!triggers("https://www.tiktok.com/@user/video/7301"));
        assert!(!triggers("https://www.tiktok.com/@user/photo/7302"));
        assert!(!triggers("https://www.tiktok.com/@user/live"));
    }

    #[test]
    fn unrelated_hosts_do_not_trigger() {
        assert!(!triggers("https://m.tiktok.com/v/1.html"));
        assert!(!triggers("https://example.com/t/abc"));
    }

    #[test]
    fn added_hosts_trigger() {
        let mut triggers = ShortLinkTriggers::default();
        triggers.add_host("Sho.rt");
        assert!(triggers.matches(&Url::parse("https://sho.rt/abc").unwrap()));
    }
}
