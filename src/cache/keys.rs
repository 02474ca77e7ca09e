//! Cache key derivation.

use std::fmt;

use axum::http::Uri;

/// Request path plus `?` plus the raw query string, byte for byte.
///
/// Parameters are not reordered or case-folded, so `a=1&b=2` and `b=2&a=1`
/// are stored under different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(path: &str, query: Option<&str>) -> Self {
        match query {
            Some(query) => Self(format!("{path}?{query}")),
            None => Self(path.to_string()),
        }
    }

    pub fn from_uri(uri: &Uri) -> Self {
        Self::new(uri.path(), uri.query())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_keeps_query_verbatim() {
        let uri: Uri = "/api/dex?types=1,2&page=2".parse().expect("valid uri");
        assert_eq!(CacheKey::from_uri(&uri).as_str(), "/api/dex?types=1,2&page=2");
    }

    #[test]
    fn parameter_order_yields_distinct_keys() {
        let first: Uri = "/api/dex?page=1&pageSize=5".parse().expect("valid uri");
        let second: Uri = "/api/dex?pageSize=5&page=1".parse().expect("valid uri");
        assert_ne!(CacheKey::from_uri(&first), CacheKey::from_uri(&second));
    }

    #[test]
    fn path_without_query_has_no_separator() {
        let uri: Uri = "/api/types".parse().expect("valid uri");
        assert_eq!(CacheKey::from_uri(&uri).as_str(), "/api/types");
    }
}
