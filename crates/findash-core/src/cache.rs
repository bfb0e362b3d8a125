//! Cache trait for storing provider responses.
//!
//! This module defines the [`ResponseCache`] trait used by the client to
//! avoid repeated identical calls, and the [`CacheKey`] that identifies a call.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::{
    endpoint::Endpoint,
    error::Result,
    types::{API_KEY_PARAM, FUNCTION_PARAM, Query, SYMBOL_PARAM},
};

/// Identity of one provider call.
///
/// Built from the endpoint, the `function` actually sent, the symbol, and the
/// remaining parameters in key order. The credential never takes part in the
/// key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    /// Endpoint that was called.
    pub endpoint: Endpoint,
    /// `function` value sent to the provider.
    pub function: String,
    /// Symbol the call was made for, if any.
    pub symbol: Option<String>,
    /// Remaining query parameters, sorted by name.
    pub params: Vec<(String, String)>,
}

impl CacheKey {
    /// Creates a key with no extra parameters.
    #[must_use]
    pub fn new(endpoint: Endpoint, symbol: Option<&str>) -> Self {
        Self {
            endpoint,
            function: endpoint.function().to_string(),
            symbol: symbol.map(str::to_string),
            params: Vec::new(),
        }
    }

    /// Derives the key of a fully prepared query.
    ///
    /// Caller parameters may override `function`, so the key follows the
    /// query rather than `endpoint`.
    #[must_use]
    pub fn from_query(endpoint: Endpoint, query: &Query) -> Self {
        let params = query
            .iter()
            .filter(|(k, _)| ![API_KEY_PARAM, FUNCTION_PARAM, SYMBOL_PARAM].contains(k))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            endpoint,
            function: query
                .get(FUNCTION_PARAM)
                .unwrap_or_else(|| endpoint.function())
                .to_string(),
            symbol: query.get(SYMBOL_PARAM).map(str::to_string),
            params,
        }
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.function)?;
        if let Some(symbol) = &self.symbol {
            write!(f, ":{symbol}")?;
        }
        for (k, v) in &self.params {
            write!(f, ":{k}={v}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Trait for caching decoded provider responses.
///
/// Entries never expire. Implementations only drop data on [`clear`](Self::clear).
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Returns `Ok(Some(value))` if the call was cached, `Ok(None)` if not.
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>>;

    /// Stores a response, replacing any earlier one for the same key.
    async fn put(&self, key: &CacheKey, value: &Value) -> Result<()>;

    /// Clears all cached data.
    async fn clear(&self) -> Result<()>;

    /// Number of cached responses.
    async fn len(&self) -> Result<usize>;

    /// Returns true if nothing is cached.
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
