//! Host patterns for domain-scoped rules, compiled to regexes.

use regex::Regex;

/// A host pattern such as `*.amazon.*` or `bing.com`.
///
/// - A leading `*.` matches one or more subdomain labels.
/// - A trailing `.*` matches one or more trailing labels (`com`, `co.uk`).
/// - A pattern without a leading wildcard also matches its `www.` form.
///
/// Hosts are compared as given; the URL parser already lowercases them.
///
/// # Example
///
/// ```
/// use link_sanitizer::DomainGlob;
///
/// let glob = DomainGlob::new("*.amazon.*");
/// assert!(glob.matches("www.amazon.co.uk"));
/// assert!(!glob.matches("amazon.com"));
/// ```
#[derive(Debug, Clone)]
pub struct DomainGlob {
    pattern: String,
    regex: Regex,
}

impl DomainGlob {
    /// Compile a host pattern.
    ///
    /// # Panics
    ///
    /// Panics if the compiled regex is rejected. Literal parts are escaped, so
    /// this only happens for pathological input; use [`try_new`](Self::try_new)
    /// for a fallible alternative.
    pub fn new(pattern: &str) -> Self {
        Self::try_new(pattern).expect("invalid domain glob")
    }

    /// Fallible constructor that returns a [`regex::Error`] for invalid patterns.
    pub fn try_new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&glob_to_regex(pattern))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Returns `true` if `host` matches this pattern.
    pub fn matches(&self, host: &str) -> bool {
        self.regex.is_match(host)
    }

    /// The pattern this glob was compiled from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let mut re = String::from("^");
    let body = match pattern.strip_prefix("*.") {
        Some(rest) => {
            re.push_str(r"(?:[^.]+\.)+");
            rest
        }
        None => {
            re.push_str(r"(?:www\.)?");
            pattern
        }
    };
    let (body, open_tail) = match body.strip_suffix(".*") {
        Some(rest) => (rest, true),
        None => (body, false),
    };
    re.push_str(&regex::escape(body));
    if open_tail {
        re.push_str(r"(?:\.[^.]+)+");
    }
    re.push('$');
    re
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_wildcard_needs_a_subdomain() {
        let glob = DomainGlob::new("*.youtube.com");
        assert!(glob.matches("www.youtube.com"));
        assert!(glob.matches("music.youtube.com"));
        assert!(glob.matches("a.b.youtube.com"));
        assert!(!glob.matches("youtube.com"));
        assert!(!glob.matches("notyoutube.com"));
    }

    #[test]
    fn wildcards_on_both_ends() {
        let glob = DomainGlob::new("*.aliexpress.*");
        assert!(glob.matches("www.aliexpress.com"));
        assert!(glob.matches("de.aliexpress.co.uk"));
        assert!(!glob.matches("aliexpress.com"));
        assert!(!glob.matches("www.aliexpress"));
    }

    #[test]
    fn trailing_wildcard_allows_www() {
        let glob = DomainGlob::new("amazon.*");
        assert!(glob.matches("amazon.de"));
        assert!(glob.matches("www.amazon.com"));
        assert!(glob.matches("amazon.co.jp"));
        assert!(!glob.matches("smile.amazon.com"));
        assert!(!glob.matches("amazon"));
    }

    #[test]
    fn plain_domain_is_literal() {
        let glob = DomainGlob::new("open.spotify.com");
        assert!(glob.matches("open.spotify.com"));
        assert!(glob.matches("www.open.spotify.com"));
        assert!(!glob.matches("open.spotifyxcom"));
        assert!(!glob.matches("spotify.com"));
    }

    #[test]
    fn dots_are_not_regex_wildcards() {
        let glob = DomainGlob::new("bing.com");
        assert!(!glob.matches("bingxcom"));
    }

    #[test]
    fn try_new_keeps_pattern() {
        let glob = DomainGlob::try_new("*.x.com").unwrap();
        assert_eq!(glob.as_str(), "*.x.com");
    }
}
