//! In-memory product cache with TTL staleness and insertion-order eviction

use crate::config::CacheConfig;
use crate::types::{CacheInfo, Product};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

struct CacheEntry {
    data: Arc<Vec<Product>>,
    stored_at: Instant,
}

#[derive(Default)]
struct Entries {
    map: HashMap<String, CacheEntry>,
    /// Keys in insertion order, oldest first
    order: VecDeque<String>,
}

/// Cache of product lists keyed by endpoint name
///
/// Expired entries are not purged; they are ignored on lookup and overwritten
/// by the next insert for the same key. When full, inserting a new key evicts
/// the key that was inserted first. Replacing an existing key keeps its
/// original position in the eviction order.
pub struct CacheStore {
    entries: Mutex<Entries>,
    enabled: bool,
    ttl: Duration,
    max_size: usize,
}

impl CacheStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            enabled: config.enabled,
            ttl: config.ttl,
            max_size: config.max_size,
        }
    }

    /// Cached data for `key`, if present and younger than the TTL
    pub async fn get(&self, key: &str) -> Option<Arc<Vec<Product>>> {
        if !self.enabled {
            return None;
        }

        let entries = self.entries.lock().await;
        let entry = entries.map.get(key)?;
        let age = entry.stored_at.elapsed();
        if age >= self.ttl {
            debug!(key, age_ms = age.as_millis() as u64, "Cache entry expired");
            return None;
        }
        Some(entry.data.clone())
    }

    /// Insert or replace the data for `key`, stamped with the current time
    pub async fn insert(&self, key: &str, data: Arc<Vec<Product>>) {
        if !self.enabled || self.max_size == 0 {
            return;
        }

        let mut entries = self.entries.lock().await;
        let entry = CacheEntry {
            data,
            stored_at: Instant::now(),
        };

        if let Some(existing) = entries.map.get_mut(key) {
            *existing = entry;
            return;
        }

        while entries.map.len() >= self.max_size {
            let Some(oldest) = entries.order.pop_front() else {
                break;
            };
            entries.map.remove(&oldest);
            debug!(key = %oldest, "Evicted oldest cache entry");
        }

        entries.order.push_back(key.to_string());
        entries.map.insert(key.to_string(), entry);
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        entries.map.clear();
        entries.order.clear();
    }

    /// Size and keys (oldest first), stale entries included
    pub async fn info(&self) -> CacheInfo {
        let entries = self.entries.lock().await;
        CacheInfo {
            size: entries.map.len(),
            keys: entries.order.iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(max_size: usize) -> CacheConfig {
        CacheConfig {
            enabled: true,
            ttl: Duration::from_secs(60),
            max_size,
        }
    }

    fn products(tag: &str) -> Arc<Vec<Product>> {
        let p: Product = serde_json::from_value(json!({ "spURL": tag })).unwrap();
        Arc::new(vec![p])
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_and_get_within_ttl() {
        let cache = CacheStore::new(&config(10));
        let data = products("a");
        cache.insert("Shoes", data.clone()).await;

        tokio::time::advance(Duration::from_secs(59)).await;
        let hit = cache.get("Shoes").await.unwrap();
        assert!(Arc::ptr_eq(&hit, &data));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_at_ttl() {
        let cache = CacheStore::new(&config(10));
        cache.insert("Shoes", products("a")).await;

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(cache.get("Shoes").await.is_none());

        // Stale entries are ignored, not purged
        assert_eq!(cache.info().await.size, 1);
    }

    #[tokio::test]
    async fn test_miss_for_unknown_key() {
        let cache = CacheStore::new(&config(10));
        assert!(cache.get("Bags").await.is_none());
    }

    #[tokio::test]
    async fn test_eviction_is_insertion_ordered() {
        let cache = CacheStore::new(&config(3));
        for key in ["a", "b", "c"] {
            cache.insert(key, products(key)).await;
        }
        // Reading does not refresh the eviction position
        assert!(cache.get("a").await.is_some());

        cache.insert("d", products("d")).await;
        let info = cache.info().await;
        assert_eq!(info.size, 3);
        assert_eq!(info.keys, vec!["b", "c", "d"]);
        assert!(cache.get("a").await.is_none());

        cache.insert("e", products("e")).await;
        assert_eq!(cache.info().await.keys, vec!["c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_size_never_exceeds_max() {
        let cache = CacheStore::new(&config(4));
        for i in 0..25 {
            cache.insert(&format!("key-{i}"), products("x")).await;
            assert!(cache.info().await.size <= 4);
        }
        assert_eq!(
            cache.info().await.keys,
            vec!["key-21", "key-22", "key-23", "key-24"]
        );
    }

    #[tokio::test]
    async fn test_replace_does_not_evict() {
        let cache = CacheStore::new(&config(2));
        cache.insert("a", products("a1")).await;
        cache.insert("b", products("b")).await;

        let replacement = products("a2");
        cache.insert("a", replacement.clone()).await;

        let info = cache.info().await;
        assert_eq!(info.size, 2);
        assert_eq!(info.keys, vec!["a", "b"]);
        assert!(Arc::ptr_eq(&cache.get("a").await.unwrap(), &replacement));

        // "a" kept its original position, so it is still evicted first
        cache.insert("c", products("c")).await;
        assert_eq!(cache.info().await.keys, vec!["b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_refreshes_timestamp() {
        let cache = CacheStore::new(&config(2));
        cache.insert("a", products("a1")).await;
        tokio::time::advance(Duration::from_secs(50)).await;
        cache.insert("a", products("a2")).await;
        tokio::time::advance(Duration::from_secs(50)).await;
        assert!(cache.get("a").await.is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = CacheStore::new(&config(5));
        cache.insert("a", products("a")).await;
        cache.insert("b", products("b")).await;
        cache.clear().await;

        assert_eq!(cache.info().await, CacheInfo::default());
        assert!(cache.get("a").await.is_none());
    }

    #[tokio::test]
    async fn test_disabled_cache_is_inert() {
        let cache = CacheStore::new(&CacheConfig {
            enabled: false,
            ..config(5)
        });
        cache.insert("a", products("a")).await;
        assert!(cache.get("a").await.is_none());
        assert_eq!(cache.info().await.size, 0);
    }

    #[tokio::test]
    async fn test_zero_capacity_retains_nothing() {
        let cache = CacheStore::new(&config(0));
        cache.insert("a", products("a")).await;
        assert!(cache.get("a").await.is_none());
        assert_eq!(cache.info().await.size, 0);
    }
}
