//! Ordered glob patterns selecting which archive entries to extract

use crate::error::PatternError;
use globset::{GlobBuilder, GlobMatcher};

/// Pattern used when none are supplied
pub const MATCH_ALL: &str = "*";

/// Ordered list of compiled glob patterns
///
/// Patterns are tried in the order given and the first match wins. `*`
/// crosses `/`, so `*.mdl` selects models in every directory.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<(String, GlobMatcher)>,
}

impl PatternSet {
    /// Compile `patterns`, falling back to [`MATCH_ALL`] when the list is empty
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        if patterns.is_empty() {
            return Self::new(&[MATCH_ALL]);
        }

        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(pattern)
                .literal_separator(false)
                .build()
                .map_err(|source| PatternError::Invalid {
                    pattern: pattern.to_string(),
                    source,
                })?;
            compiled.push((pattern.to_string(), glob.compile_matcher()));
        }
        Ok(Self { patterns: compiled })
    }

    /// Index of the first pattern matching `path`, if any
    pub fn first_match(&self, path: &str) -> Option<usize> {
        self.patterns
            .iter()
            .position(|(_, matcher)| matcher.is_match(path))
    }

    pub fn matches(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }

    /// Source text of the pattern at `index`
    pub fn pattern(&self, index: usize) -> Option<&str> {
        self.patterns.get(index).map(|(text, _)| text.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
