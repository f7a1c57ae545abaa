//! Reference redaction
//!
//! Media references can carry access tokens in query strings and credentials
//! in the authority. Only scheme, host and path reach the logs.

use regex::Regex;
use std::sync::LazyLock;

static USERINFO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.\-]*://)[^/@]*@").unwrap());

/// Strips query, fragment and userinfo from a reference.
pub fn redact_reference(reference: &str) -> String {
    let end = reference.find(['?', '#']).unwrap_or(reference.len());
    let (base, rest) = reference.split_at(end);
    let base = USERINFO_RE.replace(base, "$1[REDACTED]@");
    if rest.is_empty() {
        base.into_owned()
    } else {
        format!("{base}?[REDACTED]")
    }
}
