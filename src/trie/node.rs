//! Trie nodes: insertion, lookup and compression.
//!
//! # Responsibilities
//! - Extend the tree one token at a time while walking a pattern
//! - Explore splat, param and literal branches during lookup
//! - Merge literal-only chains after the build phase
//!
//! # Design Decisions
//! - Literal children are keyed by byte strings of uniform length per node
//!   (`children_key_length`), 1 until compression raises it
//! - Placeholder edges carry the capture name; the child below them is
//!   reached by an input-dependent number of bytes
//! - A splat node is always terminal

use std::collections::HashMap;

use crate::trie::types::{Params, TrieError, TrieMatch};

/// A named placeholder edge (`:param` or `*splat`) and the subtree below it.
#[derive(Debug, Clone)]
struct Placeholder<T> {
    name: String,
    node: Box<Node<T>>,
}

/// One position in the shared byte space of all inserted patterns.
#[derive(Debug, Clone)]
pub struct Node<T> {
    route: Option<T>,
    children: HashMap<Vec<u8>, Node<T>>,
    children_key_length: usize,
    param: Option<Placeholder<T>>,
    splat: Option<Placeholder<T>>,
}

/// Capture stack entry: placeholder name and the bytes it consumed.
type Capture<'a, 'p> = (&'a str, &'p [u8]);

impl<T> Node<T> {
    pub fn new() -> Self {
        Self {
            route: None,
            children: HashMap::new(),
            children_key_length: 1,
            param: None,
            splat: None,
        }
    }

    /// Payload stored at this node, if a pattern ends here.
    pub fn route(&self) -> Option<&T> {
        self.route.as_ref()
    }

    /// Literal child reached by `key`.
    pub fn child(&self, key: &str) -> Option<&Node<T>> {
        self.children.get(key.as_bytes())
    }

    pub fn children_len(&self) -> usize {
        self.children.len()
    }

    pub fn children_key_length(&self) -> usize {
        self.children_key_length
    }

    /// Parameter edge name and the node below it.
    pub fn param_child(&self) -> Option<(&str, &Node<T>)> {
        self.param.as_ref().map(|p| (p.name.as_str(), p.node.as_ref()))
    }

    /// Wildcard edge name and the (terminal) node below it.
    pub fn splat_child(&self) -> Option<(&str, &Node<T>)> {
        self.splat.as_ref().map(|p| (p.name.as_str(), p.node.as_ref()))
    }

    pub(crate) fn insert(
        &mut self,
        chars: &[u8],
        route: T,
        pattern: &str,
    ) -> Result<(), TrieError> {
        let Some((&first, rest)) = chars.split_first() else {
            if self.route.is_some() {
                return Err(TrieError::DuplicatePattern(pattern.to_string()));
            }
            self.route = Some(route);
            return Ok(());
        };

        match first {
            b':' => {
                let end = boundary(rest);
                let (name, remaining) = rest.split_at(end);
                placeholder(&mut self.param, name, pattern)?.insert(remaining, route, pattern)
            }
            // Everything after the marker is the name; nothing can hang below a splat.
            b'*' => placeholder(&mut self.splat, rest, pattern)?.insert(&[], route, pattern),
            _ => self
                .children
                .entry(vec![first])
                .or_insert_with(Node::new)
                .insert(rest, route, pattern),
        }
    }

    pub(crate) fn find<'a, 'p>(
        &'a self,
        path: &'p [u8],
        captures: &mut Vec<Capture<'a, 'p>>,
        matches: &mut Vec<TrieMatch<'a, T>>,
    ) {
        if path.is_empty() {
            if let Some(route) = &self.route {
                matches.push(TrieMatch {
                    route,
                    params: collect_params(captures),
                });
            }
        }

        if let Some(splat) = &self.splat {
            captures.push((splat.name.as_str(), path));
            splat.node.find(&[], captures, matches);
            captures.pop();
        }

        if let Some(param) = &self.param {
            let (value, remaining) = path.split_at(boundary(path));
            captures.push((param.name.as_str(), value));
            param.node.find(remaining, captures, matches);
            captures.pop();
        }

        if self.children.is_empty() || path.len() < self.children_key_length {
            return;
        }
        let (token, remaining) = path.split_at(self.children_key_length);
        if let Some(child) = self.children.get(token) {
            child.find(remaining, captures, matches);
        }
    }

    pub(crate) fn compress(&mut self) {
        // Placeholder subtrees are compressed on their own; never merged across.
        if let Some(splat) = &mut self.splat {
            splat.node.compress();
        }
        if let Some(param) = &mut self.param {
            param.node.compress();
        }

        while let Some(grandchild_key_length) = self.mergeable_key_length() {
            let children = std::mem::take(&mut self.children);
            let mut merged = HashMap::new();
            for (key, child) in children {
                for (grandchild_key, grandchild) in child.children {
                    let mut merged_key = key.clone();
                    merged_key.extend_from_slice(&grandchild_key);
                    merged.insert(merged_key, grandchild);
                }
            }
            self.children = merged;
            self.children_key_length += grandchild_key_length;
        }

        for child in self.children.values_mut() {
            child.compress();
        }
    }

    /// The grandchildren key length when every child can be skipped over,
    /// i.e. no child ends a pattern or owns a placeholder.
    fn mergeable_key_length(&self) -> Option<usize> {
        let mut lengths = self.children.values().map(|c| c.children_key_length);
        let first = lengths.next()?;
        if !lengths.all(|l| l == first) {
            return None;
        }
        self.children
            .values()
            .all(|c| {
                c.route.is_none()
                    && c.param.is_none()
                    && c.splat.is_none()
                    && !c.children.is_empty()
            })
            .then_some(first)
    }
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject patterns whose wildcard is followed by another segment or suffix.
///
/// Parameter names are skipped the way `insert` reads them, so a `*` inside
/// one is not mistaken for a wildcard.
pub fn validate_pattern(pattern: &str) -> Result<(), TrieError> {
    let mut rest = pattern.as_bytes();
    while let Some((&first, tail)) = rest.split_first() {
        match first {
            b':' => rest = &tail[boundary(tail)..],
            b'*' => {
                if boundary(tail) < tail.len() {
                    return Err(TrieError::WildcardNotLast(pattern.to_string()));
                }
                return Ok(());
            }
            _ => rest = tail,
        }
    }
    Ok(())
}

/// Index of the first `/` or `.`, or the length of `bytes`.
fn boundary(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .position(|b| *b == b'/' || *b == b'.')
        .unwrap_or(bytes.len())
}

fn placeholder<'n, T>(
    slot: &'n mut Option<Placeholder<T>>,
    name: &[u8],
    pattern: &str,
) -> Result<&'n mut Node<T>, TrieError> {
    let name = String::from_utf8_lossy(name);
    if let Some(existing) = slot.as_ref() {
        if existing.name != name {
            return Err(TrieError::ParamNameConflict {
                pattern: pattern.to_string(),
                existing: existing.name.clone(),
                found: name.into_owned(),
            });
        }
    }
    let edge = slot.get_or_insert_with(|| Placeholder {
        name: name.into_owned(),
        node: Box::new(Node::new()),
    });
    Ok(edge.node.as_mut())
}

fn collect_params(captures: &[Capture<'_, '_>]) -> Params {
    let mut params = Params::with_capacity(captures.len());
    for (name, value) in captures {
        // First capture wins when a pattern repeats a name.
        params
            .entry((*name).to_string())
            .or_insert_with(|| String::from_utf8_lossy(value).into_owned());
    }
    params
}
