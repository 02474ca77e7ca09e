//! Cache storage implementations.

use std::{
    num::NonZeroUsize,
    sync::RwLock,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use lru::LruCache;

use super::{
    error::CacheError,
    lock::{rw_read, rw_write},
};

const SOURCE: &str = "cache::store";

/// Key-value capability used by the cache-aside coordinator.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

/// Bounded in-process store with per-entry expiry.
///
/// Expired entries are dropped lazily when read.
pub struct MemoryCacheStore {
    entries: RwLock<LruCache<String, MemoryEntry>>,
}

impl MemoryCacheStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "memory.len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &str, now: Instant) -> Option<String> {
        let mut entries = rw_write(&self.entries, SOURCE, "memory.get");
        let live = entries.get(key).map(|entry| entry.expires_at > now)?;
        if live {
            entries.peek(key).map(|entry| entry.value.clone())
        } else {
            entries.pop(key);
            None
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.lookup(key, Instant::now()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        rw_write(&self.entries, SOURCE, "memory.set").put(key.to_string(), entry);
        Ok(())
    }
}

/// Always misses and accepts every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpCacheStore;

#[async_trait]
impl CacheStore for NoOpCacheStore {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).expect("non-zero capacity")
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryCacheStore::new(capacity(4));
        assert_eq!(store.get("/api/types").await.expect("get"), None);

        store
            .set("/api/types", "[]", Duration::from_secs(60))
            .await
            .expect("set");
        assert_eq!(
            store.get("/api/types").await.expect("get").as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn expired_entries_are_dropped_on_read() {
        let store = MemoryCacheStore::new(capacity(4));
        let now = Instant::now();
        rw_write(&store.entries, SOURCE, "test").put(
            "stale".to_string(),
            MemoryEntry {
                value: "{}".to_string(),
                expires_at: now,
            },
        );

        assert_eq!(store.lookup("stale", now), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn memory_store_evicts_least_recently_used() {
        let store = MemoryCacheStore::new(capacity(2));
        let ttl = Duration::from_secs(60);
        store.set("a", "1", ttl).await.expect("set a");
        store.set("b", "2", ttl).await.expect("set b");
        store.get("a").await.expect("touch a");
        store.set("c", "3", ttl).await.expect("set c");

        assert_eq!(store.len(), 2);
        assert!(store.get("b").await.expect("get b").is_none());
        assert!(store.get("a").await.expect("get a").is_some());
    }

    #[tokio::test]
    async fn noop_store_always_misses() {
        let store = NoOpCacheStore;
        store
            .set("key", "value", Duration::from_secs(1))
            .await
            .expect("set");
        assert_eq!(store.get("key").await.expect("get"), None);
    }
}
