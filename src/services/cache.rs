use crate::models::CandidateRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// In-process cache of candidate pools fetched from the store
///
/// Ranking itself is cheap; the cache only spares the store a round trip
/// when a user reopens the dashboard. "Refresh Matches" bypasses it.
pub struct CandidateCache {
    pools: moka::future::Cache<String, Arc<Vec<CandidateRecord>>>,
    ttl_secs: u64,
}

impl CandidateCache {
    /// Create a new cache holding at most `max_entries` pools for `ttl_secs`
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let pools = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { pools, ttl_secs }
    }

    /// Get a cached pool
    pub async fn get(&self, key: &str) -> Option<Arc<Vec<CandidateRecord>>> {
        let hit = self.pools.get(key).await;
        if hit.is_some() {
            tracing::trace!("Cache hit: {}", key);
        } else {
            tracing::trace!("Cache miss: {}", key);
        }
        hit
    }

    /// Store a pool, replacing any previous entry
    pub async fn insert(&self, key: &str, pool: Vec<CandidateRecord>) -> Arc<Vec<CandidateRecord>> {
        let pool = Arc::new(pool);
        self.pools.insert(key.to_string(), Arc::clone(&pool)).await;
        tracing::trace!("Cache set: {} ({} candidates)", key, pool.len());
        pool
    }

    /// Drop a cached pool
    pub async fn invalidate(&self, key: &str) {
        self.pools.invalidate(key).await;
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.pools.run_pending_tasks().await;
        CacheStats {
            cached_pools: self.pools.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub cached_pools: u64,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a user's candidate pool
    ///
    /// The pool depends on the requester's skill pair, so both normalized
    /// names are part of the key.
    pub fn candidates(user_id: &str, offer_key: &str, want_key: &str, pool_size: usize) -> String {
        format!("candidates:{}:{}:{}:{}", user_id, offer_key, want_key, pool_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<CandidateRecord> {
        vec![CandidateRecord {
            id: Some("c1".to_string()),
            ..CandidateRecord::default()
        }]
    }

    #[test]
    fn test_cache_insert_get_invalidate() {
        tokio_test::block_on(async {
            let cache = CandidateCache::new(10, 60);
            let key = CacheKey::candidates("user123", "react", "design", 100);

            assert!(cache.get(&key).await.is_none());

            cache.insert(&key, pool()).await;
            let cached = cache.get(&key).await.expect("pool should be cached");
            assert_eq!(cached[0].id.as_deref(), Some("c1"));
            assert_eq!(cache.stats().await.cached_pools, 1);

            cache.invalidate(&key).await;
            assert!(cache.get(&key).await.is_none());
        });
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(
            CacheKey::candidates("user123", "react", "ui/ux design", 100),
            "candidates:user123:react:ui/ux design:100"
        );
        assert_ne!(
            CacheKey::candidates("user123", "react", "design", 100),
            CacheKey::candidates("user123", "python", "design", 100)
        );
    }
}
