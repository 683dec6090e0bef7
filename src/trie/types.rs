//! Match results and error definitions for the matching engine.

use std::collections::HashMap;
use thiserror::Error;

/// Captured path parameters, keyed by name.
pub type Params = HashMap<String, String>;

/// A single structural match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieMatch<'a, T> {
    /// Payload stored at the matched pattern.
    pub route: &'a T,
    /// Parameter and wildcard captures.
    pub params: Params,
}

/// Errors raised while inserting patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrieError {
    /// The exact pattern already ends at this node.
    #[error("duplicate pattern: {0}")]
    DuplicatePattern(String),

    /// Two patterns use different names for the same placeholder position.
    #[error("pattern {pattern} names a shared placeholder `{found}`, but it is already named `{existing}`")]
    ParamNameConflict {
        pattern: String,
        existing: String,
        found: String,
    },

    /// A wildcard is followed by more pattern text.
    #[error("wildcard in pattern {0} must be the final segment")]
    WildcardNotLast(String),

    /// The trie was compressed; it no longer accepts patterns.
    #[error("trie is compressed and no longer accepts patterns")]
    Sealed,
}
