//! Handle normalization and validation.
//!
//! A normalized handle is lowercase `[a-z0-9_]+` with no leading `@`.
//! Normalization is idempotent: `normalize(normalize(h)) == normalize(h)`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Raw handles accepted at the API boundary: optional `@`, then word chars.
static RAW_HANDLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@?\w+$").expect("handle regex"));

/// Check whether a raw (pre-normalization) handle is acceptable input.
pub fn is_valid_raw(handle: &str) -> bool {
    RAW_HANDLE_RE.is_match(handle)
}

/// Normalize a social media handle: trim, lowercase, strip one leading `@`,
/// drop everything outside `[a-z0-9_]`.
///
/// May return an empty string for degenerate input (e.g. `"@@@"`); callers that
/// need a usable identity should check [`is_valid_raw`] first or skip empties.
pub fn normalize(handle: &str) -> String {
    let h = handle.trim().to_ascii_lowercase();
    let h = h.strip_prefix('@').unwrap_or(&h);
    h.chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}
