//! Pattern string algebra.
//!
//! A pattern is `"[METHOD ]path"`, e.g. `"GET /users/{id}"` or `"/users"`.
//! Only the method split and prefix joining live here; everything the path
//! may contain beyond that is opaque and left to the matching engine.

use crate::error::{Error, Result};

/// Method tokens recognised in front of a path. Matching is case-sensitive.
pub const METHODS: [&str; 9] = [
    "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "CONNECT", "TRACE",
];

/// Separates an optional method token from the path.
///
/// The pattern is split on its first space. If the token before it is not a
/// recognised method, nothing is stripped and the whole pattern (space
/// included) is returned as the path.
///
/// ```
/// use scoped_mux::routing::pattern::split_method_path;
///
/// assert_eq!(split_method_path("GET /x"), ("GET", "/x"));
/// assert_eq!(split_method_path("/x"), ("", "/x"));
/// assert_eq!(split_method_path("UNKNOWN /x"), ("", "UNKNOWN /x"));
/// ```
pub fn split_method_path(pattern: &str) -> (&str, &str) {
    match pattern.split_once(' ') {
        Some((method, path)) if METHODS.contains(&method) => (method, path),
        _ => ("", pattern),
    }
}

/// Joins a prefix with a pattern, keeping the method token in front.
///
/// One trailing `/` is removed from the prefix and a leading `/` is added to
/// the path when missing, so `"/api/"` + `"users"` gives `"/api/users"`.
pub fn join_pattern(prefix: &str, pattern: &str) -> String {
    let (method, path) = split_method_path(pattern);

    let prefix = prefix.strip_suffix('/').unwrap_or(prefix);
    let mut joined = String::with_capacity(method.len() + prefix.len() + path.len() + 2);
    if !method.is_empty() {
        joined.push_str(method);
        joined.push(' ');
    }
    joined.push_str(prefix);
    if !path.starts_with('/') {
        joined.push('/');
    }
    joined.push_str(path);
    joined
}

/// Checks a group prefix: it must be empty or start with `/`.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() || prefix.starts_with('/') {
        Ok(())
    } else {
        Err(Error::InvalidPrefix(prefix.to_string()))
    }
}
