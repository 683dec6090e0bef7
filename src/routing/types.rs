//! Registry error definitions.

use thiserror::Error;

use crate::trie::TrieError;

/// Errors that can occur while registering, building or resolving.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The same method and pattern were registered twice.
    #[error("duplicate route: {method} {pattern}")]
    DuplicateRoute { method: String, pattern: String },

    /// The matching engine rejected a pattern.
    #[error(transparent)]
    Pattern(#[from] TrieError),

    /// `resolve` was called before `build`.
    #[error("router has not been built")]
    NotBuilt,

    /// `register` or `build` was called after `build`.
    #[error("router is already built")]
    AlreadyBuilt,

    /// The input could not be parsed as a URL or path.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
