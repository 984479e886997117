//! Dotted-path navigation over `serde_json::Value` trees.
//!
//! A path like `"user.photo.url"` walks object keys only. Lookup stops with
//! `None` at the first missing key, at a non-object node, or at `null`.

use serde_json::Value;

use super::text::{parse_decimal, parse_int};

/// Navigate `node` by dotted `path`. An empty path returns `node`.
#[must_use]
pub fn json_by_path<'a>(node: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(node).filter(|v| !v.is_null());
    }
    path.split('.')
        .try_fold(node, |current, segment| current.as_object()?.get(segment))
        .filter(|v| !v.is_null())
}

/// Try each path left to right, returning the first present value.
///
/// Useful when a field moved between API versions.
#[must_use]
pub fn json_by_first_path<'a>(node: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| json_by_path(node, path))
}

/// String at `path`. Numbers and booleans are stringified; blank strings and
/// the literal `"null"` count as absent.
#[must_use]
pub fn json_string(node: &Value, path: &str) -> Option<String> {
    match json_by_path(node, path)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty() && s != "null").then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Non-negative integer at `path`, accepting numeric strings.
#[must_use]
pub fn json_u64(node: &Value, path: &str) -> Option<u64> {
    match json_by_path(node, path)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(whole_u64)),
        Value::String(s) => parse_int(s).and_then(|i| u64::try_from(i).ok()),
        _ => None,
    }
}

/// Truncate a finite, non-negative float such as `1.2e3`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_u64(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0).then(|| f as u64)
}

/// Decimal at `path`, accepting numeric strings.
#[must_use]
pub fn json_f64(node: &Value, path: &str) -> Option<f64> {
    match json_by_path(node, path)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}
