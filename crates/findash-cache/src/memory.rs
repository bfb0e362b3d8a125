//! In-memory cache implementation.

use async_trait::async_trait;
use findash_core::{CacheKey, ResponseCache, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Hit and miss counters of an [`InMemoryCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Responses currently stored.
    pub entries: usize,
}

/// Session cache keyed by [`CacheKey`].
///
/// Responses are stored in a `RwLock`-protected `HashMap` and are lost when
/// the cache is dropped. Values are cloned on get/put operations.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<CacheKey, Value>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InMemoryCache {
    /// Create a new empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the hit/miss counters.
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().await.len(),
        }
    }
}

#[async_trait]
impl ResponseCache for InMemoryCache {
    #[instrument(skip(self), fields(key = %key))]
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>> {
        let cache = self.entries.read().await;
        match cache.get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit");
                Ok(Some(value.clone()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache miss");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, value), fields(key = %key))]
    async fn put(&self, key: &CacheKey, value: &Value) -> Result<()> {
        let mut cache = self.entries.write().await;
        cache.insert(key.clone(), value.clone());
        debug!(entries = cache.len(), "Cached response");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        let mut cache = self.entries.write().await;
        let removed = cache.len();
        cache.clear();
        debug!("Cleared {} cache entries", removed);
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findash_core::{Endpoint, Query};
    use serde_json::json;

    fn overview_key(symbol: &str) -> CacheKey {
        CacheKey::new(Endpoint::Overview, Some(symbol))
    }

    #[tokio::test]
    async fn test_memory_cache_roundtrip() {
        let cache = InMemoryCache::new();
        let key = overview_key("IBM");

        // Initially no data
        assert!(cache.get(&key).await.unwrap().is_none());

        let body = json!({"Symbol": "IBM", "Sector": "TECHNOLOGY"});
        cache.put(&key, &body).await.unwrap();

        assert_eq!(cache.get(&key).await.unwrap(), Some(body));
        assert!(cache.get(&overview_key("AAPL")).await.unwrap().is_none());

        let stats = cache.stats().await;
        assert_eq!(stats, CacheStats { hits: 1, misses: 2, entries: 1 });
    }

    #[tokio::test]
    async fn test_memory_cache_distinguishes_params() {
        let cache = InMemoryCache::new();
        let compact = CacheKey::from_query(
            Endpoint::TimeSeriesDaily,
            &Query::new().with("symbol", "IBM").with("outputsize", "compact"),
        );
        let full = CacheKey::from_query(
            Endpoint::TimeSeriesDaily,
            &Query::new().with("symbol", "IBM").with("outputsize", "full"),
        );

        cache.put(&compact, &json!({"n": 100})).await.unwrap();
        assert!(cache.get(&full).await.unwrap().is_none());
        assert_eq!(cache.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_memory_cache_put_replaces() {
        let cache = InMemoryCache::new();
        let key = overview_key("IBM");
        cache.put(&key, &json!({"v": 1})).await.unwrap();
        cache.put(&key, &json!({"v": 2})).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(json!({"v": 2})));
        assert_eq!(cache.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_memory_cache_clear() {
        let cache = InMemoryCache::new();
        let key = overview_key("IBM");
        cache.put(&key, &json!({})).await.unwrap();

        // Clear cache
        cache.clear().await.unwrap();

        // Verify data is gone
        assert!(cache.get(&key).await.unwrap().is_none());
        assert!(cache.is_empty().await.unwrap());
    }
}
