//! Compiled bearer-exclusion patterns.
//!
//! Patterns are compiled lazily, once per interceptor instance, and never recompiled.
//! Matching is case-insensitive and unanchored (a pattern may match anywhere in the URL).
//! Lookaround and backreferences are supported, as in browser `RegExp` patterns.
//!
//! Failures are closed: a pattern that cannot be compiled, or a match that aborts, counts
//! as excluded. An excluded URL must never receive the token.
use std::sync::OnceLock;

use fancy_regex::Regex;

#[derive(Debug)]
enum Matcher {
    Pattern(Regex),
    /// Uncompilable pattern; excludes every URL.
    Invalid,
}

impl Matcher {
    fn is_match(&self, url: &str) -> bool {
        match self {
            Matcher::Pattern(re) => re.is_match(url).unwrap_or_else(|err| {
                tracing::warn!(pattern = %re.as_str(), error = %err, "bearer exclusion match aborted; treating url as excluded");
                true
            }),
            Matcher::Invalid => true,
        }
    }
}

#[derive(Debug, Default)]
pub struct ExclusionSet {
    matchers: OnceLock<Vec<Matcher>>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_compiled(&self) -> bool {
        self.matchers.get().is_some()
    }

    /// Compiles the set from `patterns` on the first call; later calls are no-ops.
    ///
    /// `patterns` is only invoked on the `uncompiled -> compiled` transition.
    /// An absent list compiles to an empty set.
    pub fn compile_once<F>(&self, patterns: F)
    where
        F: FnOnce() -> Option<Vec<String>>,
    {
        self.matchers
            .get_or_init(|| compile(patterns().unwrap_or_default()));
    }

    /// True if `url` matches any compiled pattern. Always false while uncompiled.
    pub fn is_excluded(&self, url: &str) -> bool {
        self.matchers
            .get()
            .is_some_and(|matchers| matchers.iter().any(|m| m.is_match(url)))
    }
}

/// Compiles one exclusion pattern the way the interceptor does.
pub fn compile_pattern(pattern: &str) -> Result<Regex, fancy_regex::Error> {
    Regex::new(&format!("(?i){pattern}"))
}

fn compile(patterns: Vec<String>) -> Vec<Matcher> {
    patterns
        .iter()
        .map(|pattern| match compile_pattern(pattern) {
            Ok(re) => Matcher::Pattern(re),
            Err(err) => {
                tracing::error!(pattern = %pattern, error = %err, "invalid bearer exclusion pattern; it excludes every url");
                Matcher::Invalid
            }
        })
        .collect()
}
