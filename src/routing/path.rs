//! Request path extraction.
//!
//! # Responsibilities
//! - Split the path component out of a full URL or a bare path
//! - Percent-decode it before matching
//!
//! # Design Decisions
//! - The path is taken from the input text as written: no dot-segment
//!   removal and no re-encoding, so `/a/../b` reaches the trie unchanged
//! - `url` only validates absolute URLs; its normalized `path()` is used
//!   only for absolute URLs without an authority
//! - Invalid UTF-8 after decoding is replaced, never an error

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::routing::types::RouterError;

/// Percent-decode a raw request path.
pub fn decode_path(raw: &str) -> Cow<'_, str> {
    percent_decode_str(raw).decode_utf8_lossy()
}

/// The decoded path component of `url`, which may be absolute
/// (`http://host/p?q#f`) or a bare path (`/p?q`).
pub fn request_path(url: &str) -> Result<String, RouterError> {
    let without_suffix = strip_query_and_fragment(url);
    let raw = match Url::parse(url) {
        Ok(parsed) if parsed.cannot_be_a_base() => "",
        Ok(parsed) => match without_suffix.split_once("://") {
            Some((_, rest)) => rest.find('/').map_or("", |start| &rest[start..]),
            None => return Ok(decode_path(parsed.path()).into_owned()),
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => without_suffix,
        Err(e) => return Err(e.into()),
    };
    Ok(decode_path(raw).into_owned())
}

fn strip_query_and_fragment(url: &str) -> &str {
    let end = url.find(|c| c == '?' || c == '#').unwrap_or(url.len());
    &url[..end]
}
