//! URL rewrite stages and the pipeline that chains them.
//!
//! Stages implement the [`UrlRewrite`] trait and are composed into a
//! [`RewritePipeline`] that runs them in order, each on the output of the
//! previous one.
//!
//! Built-in stages:
//!
//! - [`StripTrackingParams`] -- drops query parameters matched by a [`RuleTable`](crate::RuleTable).
//! - [`TikTokMirror`] -- moves TikTok video links to the embed mirror.
//! - [`TikTokLiveQuery`] -- drops the query of TikTok live links.
//! - [`XMirror`] -- moves `x.com` links to the embed mirror.
//! - [`InstagramRewrite`] -- collapses `profilecard` pages and mirrors reels and posts.

mod mirror;
mod params;

pub use mirror::{InstagramRewrite, TikTokLiveQuery, TikTokMirror, XMirror};
pub use params::{StripTrackingParams, strip_query};

use std::sync::Arc;

use url::Url;

use crate::rules::RuleTable;

/// Host suffix of the short-form video platform.
pub const TIKTOK_SUFFIX: &str = "tiktok.com";
/// Path segment that marks a TikTok photo-album post.
pub const PHOTO_SEGMENT: &str = "/photo/";
/// Path segment that marks a TikTok live stream.
pub const LIVE_SEGMENT: &str = "/live";

/// A pure transformation of a URL.
///
/// Stages never mutate their input. They return `Some(new_url)` only when the
/// result differs from the input, which is what marks a token as changed.
/// Implementations must be `Send + Sync` so one pipeline can serve concurrent
/// callers.
pub trait UrlRewrite: Send + Sync {
    /// Rewrite `url`, or return `None` to leave it as is.
    fn rewrite(&self, url: &Url) -> Option<Url>;
}

/// A URL after passing through a [`RewritePipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub url: Url,
    pub changed: bool,
}

/// An ordered chain of [`UrlRewrite`] stages applied sequentially.
///
/// An empty pipeline is a no-op.
pub struct RewritePipeline {
    stages: Vec<Box<dyn UrlRewrite>>,
}

impl RewritePipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The canonical stage order: parameter stripping, then domain rewrites.
    pub fn standard(rules: Arc<RuleTable>) -> Self {
        let mut pipeline = Self::new();
        pipeline.add(StripTrackingParams::new(rules));
        pipeline.add(TikTokMirror);
        pipeline.add(TikTokLiveQuery);
        pipeline.add(XMirror);
        pipeline.add(InstagramRewrite);
        pipeline
    }

    /// Append a stage to the end of the pipeline.
    pub fn add(&mut self, stage: impl UrlRewrite + 'static) {
        self.stages.push(Box::new(stage));
    }

    /// Run every stage on `url`.
    pub fn apply(&self, url: Url) -> Rewritten {
        self.stages.iter().fold(
            Rewritten {
                url,
                changed: false,
            },
            |acc, stage| match stage.rewrite(&acc.url) {
                Some(url) => Rewritten { url, changed: true },
                None => acc,
            },
        )
    }

    /// Returns `true` if no stages have been added.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Default for RewritePipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns `true` for TikTok photo-album post URLs.
pub fn is_photo_album(url: &Url) -> bool {
    url.host_str()
        .is_some_and(|host| host.ends_with(TIKTOK_SUFFIX))
        && url.path().contains(PHOTO_SEGMENT)
}

/// Result of the synchronous canonicalization steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    pub url: Url,
    pub changed: bool,
    pub photo_album: bool,
}

/// Canonicalize an already parsed (and, if needed, expanded) URL.
///
/// Photo-album posts only lose their query; everything else goes through
/// `pipeline`.
pub fn canonicalize(url: Url, pipeline: &RewritePipeline) -> Canonical {
    if is_photo_album(&url) {
        let stripped = strip_query(&url);
        return Canonical {
            changed: stripped.is_some(),
            url: stripped.unwrap_or(url),
            photo_album: true,
        };
    }
    let Rewritten { url, changed } = pipeline.apply(url);
    Canonical {
        url,
        changed,
        photo_album: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> RewritePipeline {
        RewritePipeline::standard(RuleTable::shared())
    }

    fn run(input: &str) -> Canonical {
        canonicalize(Url::parse(input).unwrap(), &standard())
    }

    struct AppendPath(&'static str);

    impl UrlRewrite for AppendPath {
        fn rewrite(&self, url: &Url) -> Option<Url> {
            let mut next = url.clone();
            next.set_path(&format!("{}{}", url.path(), self.0));
            Some(next)
        }
    }

    #[test]
    fn pipeline_empty_is_empty() {
        assert!(RewritePipeline::new().is_empty());
        assert!(RewritePipeline::default().is_empty());
        assert!(!standard().is_empty());
    }

    #[test]
    fn pipeline_with_no_stages_returns_original() {
        let url = Url::parse("https://example.com/a?utm_source=x").unwrap();
        let out = RewritePipeline::new().apply(url.clone());
        assert_eq!(out.url, url);
        assert!(!out.changed);
    }

    #[test]
    fn pipeline_chains_stages_in_order() {
        let mut pipeline = RewritePipeline::new();
        pipeline.add(AppendPath("a"));
        pipeline.add(AppendPath("b"));
        let out = pipeline.apply(Url::parse("https://example.com/").unwrap());
        assert_eq!(out.url.as_str(), "https://example.com/ab");
        assert!(out.changed);
    }

    #[test]
    fn universal_rule_keeps_other_params() {
        let out = run("https://example.com/?utm_source=x&id=1");
        assert_eq!(out.url.as_str(), "https://example.com/?id=1");
        assert!(out.changed);
        assert!(!out.photo_album);
    }

    #[test]
    fn amazon_domain_scoped_params_removed() {
        let out = run("https://www.amazon.com/dp/B000?pf_rd_m=1&tag=abc");
        assert_eq!(out.url.as_str(), "https://www.amazon.com/dp/B000");
        assert!(out.changed);
    }

    #[test]
    fn x_status_moves_to_mirror_without_params() {
        let out = run("https://x.com/user/status/1");
        assert_eq!(out.url.as_str(), "https://fixupx.com/user/status/1");
        assert!(out.changed);
    }

    #[test]
    fn tiktok_live_drops_query_and_keeps_host() {
        let out = run("https://sub.tiktok.com/@user/live?foo=bar");
        assert_eq!(out.url.as_str(), "https://sub.tiktok.com/@user/live");
        assert!(out.changed);
    }

    #[test]
    fn tiktok_video_moves_to_mirror() {
        let out = run("https://www.tiktok.com/@user/video/7301?_r=1&_t=abc&lang=en");
        assert_eq!(out.url.as_str(), "https://vm.dstn.to/@user/video/7301?lang=en");
        assert!(out.changed);
    }

    #[test]
    fn photo_album_keeps_host_and_drops_query() {
        let out = run("https://www.tiktok.com/@user/photo/7302?utm_source=copy&lang=en");
        assert_eq!(out.url.as_str(), "https://www.tiktok.com/@user/photo/7302");
        assert!(out.changed);
        assert!(out.photo_album);
    }

    #[test]
    fn photo_album_without_query_is_unchanged() {
        let out = run("https://www.tiktok.com/@user/photo/7302");
        assert_eq!(out.url.host_str(), Some("www.tiktok.com"));
        assert!(!out.changed);
        assert!(out.photo_album);
    }

    #[test]
    fn instagram_reel_is_mirrored() {
        let out = run("https://www.instagram.com/reel/Cx1/?igshid=abc");
        assert_eq!(out.url.as_str(), "https://ddinstagram.com/reel/Cx1/");
        assert!(out.changed);
    }

    #[test]
    fn untouched_url_reports_no_change() {
        let out = run("https://docs.rs/url/latest/url/?search=parse");
        assert_eq!(out.url.as_str(), "https://docs.rs/url/latest/url/?search=parse");
        assert!(!out.changed);
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let inputs = [
            "https://example.com/?utm_source=x&id=1",
            "https://www.amazon.com/dp/B000?pf_rd_m=1&tag=abc&th=1",
            "https://x.com/user/status/1?s=20&t=abc",
            "https://sub.tiktok.com/@user/live?foo=bar",
            "https://www.tiktok.com/@user/video/7301?_r=1",
            "https://www.tiktok.com/@user/photo/7302?_r=1",
            "https://www.instagram.com/reel/Cx1/?igshid=abc",
            "https://instagram.com/someone/profilecard/?igsh=xyz",
            "https://www.youtube.com/watch?v=abc&si=def&feature=share",
        ];
        for input in inputs {
            let once = run(input);
            let twice = canonicalize(once.url.clone(), &standard());
            assert_eq!(twice.url, once.url, "not idempotent: {input}");
            assert!(!twice.changed, "second pass changed: {input}");
        }
    }
}
