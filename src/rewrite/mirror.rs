//! Domain rewrites towards embed-friendly mirrors.

use url::Url;

use super::{LIVE_SEGMENT, PHOTO_SEGMENT, TIKTOK_SUFFIX, UrlRewrite};

pub const TIKTOK_MIRROR: &str = "vm.dstn.to";
pub const X_HOST: &str = "x.com";
pub const X_MIRROR: &str = "fixupx.com";
pub const INSTAGRAM_SUFFIX: &str = "instagram.com";
pub const INSTAGRAM_MIRROR: &str = "ddinstagram.com";

/// Instagram page that only renders with a share id attached.
const PROFILE_CARD: &str = "profilecard";
/// Path segments of Instagram reels and single posts.
const INSTAGRAM_MEDIA_SEGMENTS: &[&str] = &["reel", "reels", "p", "tv"];

fn host_ends_with(url: &Url, suffix: &str) -> bool {
    url.host_str().is_some_and(|host| host.ends_with(suffix))
}

fn with_host(url: &Url, host: &str) -> Option<Url> {
    if url.host_str() == Some(host) {
        return None;
    }
    let mut next = url.clone();
    next.set_host(Some(host)).ok()?;
    Some(next)
}

/// TikTok links other than photo posts and live streams go to [`TIKTOK_MIRROR`].
pub struct TikTokMirror;

impl UrlRewrite for TikTokMirror {
    fn rewrite(&self, url: &Url) -> Option<Url> {
        let path = url.path();
        if !host_ends_with(url, TIKTOK_SUFFIX)
            || path.contains(PHOTO_SEGMENT)
            || path.contains(LIVE_SEGMENT)
        {
            return None;
        }
        with_host(url, TIKTOK_MIRROR)
    }
}

/// TikTok live links lose their query: it carries session tokens.
pub struct TikTokLiveQuery;

impl UrlRewrite for TikTokLiveQuery {
    fn rewrite(&self, url: &Url) -> Option<Url> {
        if !host_ends_with(url, TIKTOK_SUFFIX) || !url.path().contains(LIVE_SEGMENT) {
            return None;
        }
        super::strip_query(url)
    }
}

/// `x.com` links go to [`X_MIRROR`].
pub struct XMirror;

impl UrlRewrite for XMirror {
    fn rewrite(&self, url: &Url) -> Option<Url> {
        if url.host_str() != Some(X_HOST) {
            return None;
        }
        with_host(url, X_MIRROR)
    }
}

/// Instagram cleanup.
///
/// `/<user>/profilecard/...` collapses to `/<user>`, and reels and posts move
/// to [`INSTAGRAM_MIRROR`]. Profiles and other pages keep their host.
pub struct InstagramRewrite;

impl UrlRewrite for InstagramRewrite {
    fn rewrite(&self, url: &Url) -> Option<Url> {
        if !host_ends_with(url, INSTAGRAM_SUFFIX) {
            return None;
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segs| segs.collect())
            .unwrap_or_default();
        let mut next = url.clone();
        let mut changed = false;

        if segments.get(1) == Some(&PROFILE_CARD) {
            next.set_path(&format!("/{}", segments[0]));
            changed = true;
        }

        let is_media = next
            .path_segments()
            .is_some_and(|mut segs| segs.any(|s| INSTAGRAM_MEDIA_SEGMENTS.contains(&s)));
        if is_media {
            if let Some(mirrored) = with_host(&next, INSTAGRAM_MIRROR) {
                next = mirrored;
                changed = true;
            }
        }

        changed.then_some(next)
    }
}
