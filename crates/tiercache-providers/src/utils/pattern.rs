//! Glob patterns over cache keys and file names

use globset::{Glob, GlobMatcher};
use tiercache_domain::error::{Error, Result};

/// Compiled glob used to select keys for invalidation
///
/// Supports `*`, `?` and `[...]` like the remote store's own matcher. `*`
/// also matches `/`, since keys are not paths.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    matcher: GlobMatcher,
}

impl KeyPattern {
    /// Compile `pattern`
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = Glob::new(pattern).map_err(|e| {
            Error::invalid_argument(format!("Invalid key pattern '{pattern}': {e}"))
        })?;
        Ok(Self {
            matcher: glob.compile_matcher(),
        })
    }

    /// Whether `candidate` matches
    pub fn matches(&self, candidate: &str) -> bool {
        self.matcher.is_match(candidate)
    }
}
