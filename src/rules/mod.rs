//! Tracking-parameter rule table and matcher.
//!
//! A [`RuleTable`] holds two kinds of rules:
//!
//! - universal [`Rule`]s, each a parameter-name prefix optionally scoped to a
//!   [`DomainGlob`];
//! - a [`DomainRuleSet`] mapping host substrings to parameter prefixes.
//!
//! Tables are immutable once built and shared by reference. The built-in
//! table is compiled once per process, see [`RuleTable::shared`].

mod defaults;
mod glob;

pub use glob::DomainGlob;

use std::sync::{Arc, LazyLock};

static BUILTIN: LazyLock<Arc<RuleTable>> = LazyLock::new(|| Arc::new(RuleTable::builtin()));

/// A single universal removal rule.
#[derive(Debug, Clone)]
pub struct Rule {
    prefix: String,
    domain: Option<DomainGlob>,
}

impl Rule {
    /// Parse a rule in `param`, `param*` or `param@host-glob` notation.
    ///
    /// A trailing `*` on the parameter part is dropped: prefix matching
    /// already covers the whole family.
    pub fn parse(spec: &str) -> Result<Self, regex::Error> {
        let (param, domain) = match spec.split_once('@') {
            Some((param, glob)) => (param, Some(DomainGlob::try_new(glob)?)),
            None => (spec, None),
        };
        Ok(Self {
            prefix: param.trim_end_matches('*').to_string(),
            domain,
        })
    }

    /// The parameter-name prefix this rule removes.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The host scope, if any.
    pub fn domain(&self) -> Option<&DomainGlob> {
        self.domain.as_ref()
    }

    /// Returns `true` if `param` on `host` falls under this rule.
    pub fn matches(&self, param: &str, host: &str) -> bool {
        param.starts_with(&self.prefix) && self.domain.as_ref().is_none_or(|d| d.matches(host))
    }
}

/// Ordered mapping from host substrings to parameter prefixes.
#[derive(Debug, Clone, Default)]
pub struct DomainRuleSet {
    entries: Vec<(String, Vec<String>)>,
}

impl DomainRuleSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append prefixes under a host-substring key.
    pub fn insert<I, S>(&mut self, key: &str, prefixes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes = prefixes.into_iter().map(Into::into);
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => existing.extend(prefixes),
            None => self.entries.push((key.to_string(), prefixes.collect())),
        }
    }

    /// Returns `true` if any key contained in `host` lists a prefix of `param`.
    pub fn matches(&self, param: &str, host: &str) -> bool {
        self.entries
            .iter()
            .filter(|(key, _)| host.contains(key.as_str()))
            .any(|(_, prefixes)| prefixes.iter().any(|p| param.starts_with(p.as_str())))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable set of tracking-parameter rules.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    universal: Vec<Rule>,
    domains: DomainRuleSet,
}

impl RuleTable {
    /// Create a table from already-parsed parts.
    pub fn new(universal: Vec<Rule>, domains: DomainRuleSet) -> Self {
        Self { universal, domains }
    }

    /// Parse universal rules from ClearURLs-style strings.
    pub fn try_from_specs<'a>(
        specs: impl IntoIterator<Item = &'a str>,
        domains: DomainRuleSet,
    ) -> Result<Self, regex::Error> {
        let universal = specs
            .into_iter()
            .map(Rule::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { universal, domains })
    }

    /// Build the table that ships with the crate.
    ///
    /// # Panics
    ///
    /// Panics if a built-in rule fails to compile, which the unit tests rule out.
    pub fn builtin() -> Self {
        let mut domains = DomainRuleSet::new();
        for (key, prefixes) in defaults::DOMAIN_RULES {
            domains.insert(key, prefixes.iter().copied());
        }
        Self::try_from_specs(defaults::UNIVERSAL_RULES.iter().copied(), domains)
            .expect("built-in rule table is valid")
    }

    /// The built-in table, compiled on first use and shared afterwards.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Decide whether query parameter `param` must be removed from a URL on `host`.
    ///
    /// Universal rules are checked first, then domain rules whose key is a
    /// substring of `host`. Parameter names are compared case-sensitively.
    pub fn should_remove(&self, param: &str, host: &str) -> bool {
        self.universal.iter().any(|rule| rule.matches(param, host))
            || self.domains.matches(param, host)
    }

    pub fn universal(&self) -> &[Rule] {
        &self.universal
    }

    pub fn domains(&self) -> &DomainRuleSet {
        &self.domains
    }
}
