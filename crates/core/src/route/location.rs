//! Route locations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Query;

/// A resolved position in the application: the data part of a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Name of the innermost matched route table entry, if it has one.
    pub name: Option<String>,
    /// Path without query or hash, always starting with `/`.
    pub path: String,
    /// Parameters captured by the route pattern.
    pub params: BTreeMap<String, String>,
    pub query: Query,
    /// Fragment without the leading `#`.
    pub hash: String,
}

impl Location {
    /// The location the application sits on before its first navigation.
    pub fn start() -> Self {
        Self {
            path: "/".to_string(),
            ..Default::default()
        }
    }

    /// Builds an unnamed location from a URL such as `/a/b?x=1#top`.
    pub fn from_url(url: &str) -> Self {
        let (path, query, hash) = split_url(url);
        Self {
            name: None,
            path: path.to_string(),
            params: BTreeMap::new(),
            query: Query::parse(query),
            hash: hash.to_string(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Path plus query and hash, as it would appear in the address bar.
    pub fn full_path(&self) -> String {
        let mut full = self.path.clone();
        if !self.query.is_empty() {
            full.push('?');
            full.push_str(&self.query.to_string());
        }
        if !self.hash.is_empty() {
            full.push('#');
            full.push_str(&self.hash);
        }
        full
    }

    /// Whether both locations belong to the same route table entry.
    ///
    /// Two unnamed locations count as the same entry.
    pub fn same_entry(&self, other: &Location) -> bool {
        self.name == other.name
    }
}

/// Splits a URL into `(path, query, hash)`, without the `?` and `#` markers.
///
/// An empty path becomes `/`. Only the path, query and fragment of the URL
/// are considered; there is no scheme or authority handling.
pub fn split_url(url: &str) -> (&str, &str, &str) {
    let (rest, hash) = url.split_once('#').unwrap_or((url, ""));
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
    let path = if path.is_empty() { "/" } else { path };
    (path, query, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_url() {
        assert_eq!(split_url("/a/b?x=1#top"), ("/a/b", "x=1", "top"));
        assert_eq!(split_url("/a#frag?not-query"), ("/a", "", "frag?not-query"));
        assert_eq!(split_url("?x=1"), ("/", "x=1", ""));
        assert_eq!(split_url(""), ("/", "", ""));
    }

    #[test]
    fn test_from_url() {
        let location = Location::from_url("/products?page=2#reviews");
        assert_eq!(location.path, "/products");
        assert_eq!(location.query.get("page"), Some("2"));
        assert_eq!(location.hash, "reviews");
        assert!(location.name.is_none());
    }

    #[test]
    fn test_full_path() {
        let location = Location::from_url("/products?page=2#reviews");
        assert_eq!(location.full_path(), "/products?page=2#reviews");
        assert_eq!(Location::start().full_path(), "/");
    }

    #[test]
    fn test_same_entry() {
        let a = Location::from_url("/product/1").with_name("product");
        let b = Location::from_url("/product/2").with_name("product");
        let home = Location::from_url("/").with_name("home");
        assert!(a.same_entry(&b));
        assert!(!a.same_entry(&home));
        assert!(Location::start().same_entry(&Location::from_url("/x")));
    }
}
