//! Matching engine.
//!
//! # Data Flow
//! ```text
//! Build phase (single thread):
//!     pattern "/users/:id/*rest"
//!     → node.rs (walk pattern byte by byte, extend trie)
//!     → compress (merge literal-only chains into longer keys)
//!     → Trie sealed, shared read-only
//!
//! Lookup (any number of threads):
//!     path "/users/42/a/b"
//!     → node.rs (splat, then param, then literal branch at every node)
//!     → Vec<TrieMatch> (every structural match, with captures)
//! ```
//!
//! # Design Decisions
//! - Path-keyed only; HTTP methods and declaration order belong to the registry
//! - Children are owned (`HashMap` + `Box`), no parent pointers, no sharing
//! - Literal keys are bytes; captures start and end on ASCII boundaries so
//!   captured values are always valid slices of the input
//! - Capture stack is allocated per lookup, so lookups never share state
//! - Compression is a pure optimization: `find_all` returns the same set
//!   before and after

pub mod node;
pub mod types;

pub use node::{validate_pattern, Node};
pub use types::{Params, TrieError, TrieMatch};

/// A prefix tree over route patterns.
///
/// `T` is the payload stored at the end of each pattern. The routing layer
/// stores declaration indices here.
#[derive(Debug, Clone)]
pub struct Trie<T> {
    root: Node<T>,
    len: usize,
    compressed: bool,
}

impl<T> Trie<T> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            len: 0,
            compressed: false,
        }
    }

    /// Insert `pattern`, storing `route` at its terminal node.
    ///
    /// `:name` introduces a parameter (captures up to the next `/` or `.`),
    /// `*name` introduces a wildcard (captures the rest of the path).
    pub fn insert(&mut self, pattern: &str, route: T) -> Result<(), TrieError> {
        if self.compressed {
            return Err(TrieError::Sealed);
        }
        validate_pattern(pattern)?;
        self.root.insert(pattern.as_bytes(), route, pattern)?;
        self.len += 1;
        Ok(())
    }

    /// Return every route whose pattern matches `path` in full.
    ///
    /// The order of the result carries no meaning; callers pick the winner.
    pub fn find_all(&self, path: &str) -> Vec<TrieMatch<'_, T>> {
        let mut matches = Vec::new();
        let mut captures = Vec::new();
        self.root
            .find(path.as_bytes(), &mut captures, &mut matches);
        matches
    }

    /// Merge literal-only chains. Further inserts are rejected afterwards.
    pub fn compress(&mut self) {
        if self.compressed {
            return;
        }
        self.root.compress();
        self.compressed = true;
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Number of patterns stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root(&self) -> &Node<T> {
        &self.root
    }
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}
