//! Query-parameter stripping stage.

use std::sync::Arc;

use url::Url;
use url::form_urlencoded;

use super::UrlRewrite;
use crate::rules::RuleTable;

/// Stage that removes tracking parameters matched by a [`RuleTable`].
///
/// Surviving parameters keep their order and their original encoding; a
/// query left empty is removed entirely.
///
/// # Example
///
/// ```
/// use link_sanitizer::{RuleTable, StripTrackingParams, UrlRewrite};
/// use url::Url;
///
/// let stage = StripTrackingParams::new(RuleTable::shared());
/// let url = Url::parse("https://example.com/a?b=2&utm_medium=x&a=1").unwrap();
/// assert_eq!(stage.rewrite(&url).unwrap().as_str(), "https://example.com/a?b=2&a=1");
/// ```
pub struct StripTrackingParams {
    rules: Arc<RuleTable>,
}

impl StripTrackingParams {
    /// Create a new stage backed by `rules`.
    pub fn new(rules: Arc<RuleTable>) -> Self {
        Self { rules }
    }
}

impl UrlRewrite for StripTrackingParams {
    fn rewrite(&self, url: &Url) -> Option<Url> {
        let query = url.query()?;
        let host = url.host_str().unwrap_or_default();

        // Decide on a snapshot of the raw pairs, then rebuild from the survivors.
        let pairs: Vec<&str> = query.split('&').collect();
        let kept: Vec<&str> = pairs
            .iter()
            .copied()
            .filter(|pair| !self.rules.should_remove(&param_name(pair), host))
            .collect();
        if kept.len() == pairs.len() {
            return None;
        }

        // Empty pairs from `&&` would leave stray separators once neighbours are gone.
        let kept: Vec<&str> = kept.into_iter().filter(|pair| !pair.is_empty()).collect();
        let mut next = url.clone();
        if kept.is_empty() {
            next.set_query(None);
        } else {
            next.set_query(Some(&kept.join("&")));
        }
        Some(next)
    }
}

/// Drop the whole query, or return `None` if there is none.
pub fn strip_query(url: &Url) -> Option<Url> {
    url.query()?;
    let mut next = url.clone();
    next.set_query(None);
    Some(next)
}

/// Decoded name of a raw `name=value` pair.
fn param_name(pair: &str) -> String {
    let raw = pair.split_once('=').map_or(pair, |(name, _)| name);
    form_urlencoded::parse(raw.as_bytes())
        .next()
        .map(|(name, _)| name.into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(input: &str) -> Option<String> {
        StripTrackingParams::new(RuleTable::shared())
            .rewrite(&Url::parse(input).unwrap())
            .map(String::from)
    }

    #[test]
    fn no_query_is_left_alone() {
        assert_eq!(strip("https://example.com/page"), None);
    }

    #[test]
    fn clean_query_is_left_alone() {
        assert_eq!(strip("https://example.com/search?q=rust&page=2"), None);
    }

    #[test]
    fn removes_every_tracking_param_and_drops_empty_query() {
        assert_eq!(
            strip("https://example.com/post?utm_source=tw&utm_medium=social&fbclid=x"),
            Some("https://example.com/post".to_string())
        );
    }

    #[test]
    fn survivors_keep_order_and_encoding() {
        assert_eq!(
            strip("https://example.com/s?z=1&gclid=abc&q=a%20b+c&a=%2F"),
            Some("https://example.com/s?z=1&q=a%20b+c&a=%2F".to_string())
        );
    }

    #[test]
    fn duplicate_params_are_all_removed() {
        assert_eq!(
            strip("https://example.com/?utm_term=a&x=1&utm_term=b"),
            Some("https://example.com/?x=1".to_string())
        );
    }

    #[test]
    fn encoded_names_are_decoded_before_matching() {
        assert_eq!(
            strip("https://example.com/?utm%5Fsource=x&id=1"),
            Some("https://example.com/?id=1".to_string())
        );
    }

    #[test]
    fn fragment_survives() {
        assert_eq!(
            strip("https://example.com/doc?mc_cid=1#section-2"),
            Some("https://example.com/doc#section-2".to_string())
        );
    }

    #[test]
    fn empty_pairs_leave_no_stray_separators() {
        assert_eq!(
            strip("https://example.com/?utm_source=x&&a=1"),
            Some("https://example.com/?a=1".to_string())
        );
        assert_eq!(
            strip("https://example.com/?a=1&&utm_source=x"),
            Some("https://example.com/?a=1".to_string())
        );
        assert_eq!(
            strip("https://example.com/?&utm_source=x&"),
            Some("https://example.com/".to_string())
        );
        // Nothing removed, so the query is left exactly as written.
        assert_eq!(strip("https://example.com/?a=1&&b=2"), None);
    }

    #[test]
    fn strip_query_only_reports_real_changes() {
        let bare = Url::parse("https://www.tiktok.com/@a/photo/1").unwrap();
        assert!(strip_query(&bare).is_none());
        let with = Url::parse("https://www.tiktok.com/@a/photo/1?lang=en").unwrap();
        assert_eq!(
            strip_query(&with).unwrap().as_str(),
            "https://www.tiktok.com/@a/photo/1"
        );
    }
}
