//! Core data types shared across the workspace.
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`Query`] - Sorted query parameter set sent to the provider

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Query parameter holding the credential.
pub const API_KEY_PARAM: &str = "apikey";

/// Query parameter holding the endpoint identifier.
pub const FUNCTION_PARAM: &str = "function";

/// Query parameter holding the ticker.
pub const SYMBOL_PARAM: &str = "symbol";

/// A trading symbol/ticker.
///
/// Symbols are trimmed and uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Query parameters for one provider call.
///
/// Keys are kept sorted so two queries with the same parameters compare and
/// hash equal regardless of insertion order. Inserting an existing key
/// replaces its value. `Debug` output hides the credential.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Query(BTreeMap<String, String>);

impl Query {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a parameter, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        self.0.insert(key.into(), value.to_string())
    }

    /// Removes a parameter, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns true if the parameter is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates over parameter names in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Copies every parameter of `other` into `self`, overriding clashes.
    pub fn merge(&mut self, other: &Self) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Returns the parameters as borrowed pairs, suitable for URL encoding.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.iter().collect()
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| {
                if k == API_KEY_PARAM {
                    (k, "[REDACTED]")
                } else {
                    (k, v)
                }
            }))
            .finish()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (k, v) in iter {
            query.insert(k, v);
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalization() {
        let symbol = Symbol::new(" aapl ");
        assert_eq!(symbol.as_str(), "AAPL");
        assert_eq!(symbol, "AAPL".parse().unwrap());
        assert!(Symbol::new("  ").is_empty());
    }

    #[test]
    fn test_query_is_order_independent() {
        let a = Query::new().with("limit", 50).with("topics", "ipo");
        let b: Query = [("topics", "ipo"), ("limit", "50")].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.keys().collect::<Vec<_>>(), vec!["limit", "topics"]);
    }

    #[test]
    fn test_query_insert_overrides() {
        let mut query = Query::new().with("outputsize", "compact");
        assert_eq!(query.insert("outputsize", "full"), Some("compact".to_string()));
        assert_eq!(query.get("outputsize"), Some("full"));
        assert_eq!(query.len(), 1);
    }

    #[test]
    fn test_query_merge() {
        let mut base = Query::new().with("a", 1).with("b", 2);
        base.merge(&Query::new().with("b", 3).with("c", 4));
        assert_eq!(base.pairs(), vec![("a", "1"), ("b", "3"), ("c", "4")]);
    }

    #[test]
    fn test_query_debug_redacts_api_key() {
        let query = Query::new()
            .with(API_KEY_PARAM, "secret_key_12345")
            .with(SYMBOL_PARAM, "IBM");
        let debug_str = format!("{query:?}");
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("IBM"));
    }
}
