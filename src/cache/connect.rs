use std::{sync::Arc, time::Duration};

use tokio::time::timeout;
use tracing::{info, warn};

use super::{
    config::{CacheBackend, CacheConfig},
    redis_store::RedisCacheStore,
    store::{CacheStore, MemoryCacheStore, NoOpCacheStore},
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the cache store once at startup.
///
/// Never fails: an unreachable or misconfigured Redis falls back to
/// [`NoOpCacheStore`] and the service keeps answering from memory.
pub async fn connect_store(config: &CacheConfig) -> Arc<dyn CacheStore> {
    let store: Arc<dyn CacheStore> = match config.backend {
        CacheBackend::Disabled => Arc::new(NoOpCacheStore),
        CacheBackend::Memory => Arc::new(MemoryCacheStore::new(config.memory_capacity)),
        CacheBackend::Redis => match config.url.as_deref() {
            Some(url) => connect_redis(url).await,
            None => {
                warn!(
                    target = "bestiary::cache",
                    backend = %config.backend,
                    "No cache URL configured; caching disabled"
                );
                Arc::new(NoOpCacheStore)
            }
        },
    };

    info!(
        target = "bestiary::cache",
        backend = store.name(),
        ttl_seconds = config.ttl.as_secs(),
        timeout_ms = config.timeout.as_millis() as u64,
        "Cache store ready"
    );

    store
}

async fn connect_redis(url: &str) -> Arc<dyn CacheStore> {
    match timeout(CONNECT_TIMEOUT, RedisCacheStore::connect(url)).await {
        Ok(Ok(store)) => Arc::new(store),
        Ok(Err(err)) => {
            warn!(
                target = "bestiary::cache",
                error = %err,
                "Redis unavailable; caching disabled"
            );
            Arc::new(NoOpCacheStore)
        }
        Err(_) => {
            warn!(
                target = "bestiary::cache",
                timeout_ms = CONNECT_TIMEOUT.as_millis() as u64,
                "Redis connection timed out; caching disabled"
            );
            Arc::new(NoOpCacheStore)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_backend_uses_noop() {
        let store = connect_store(&CacheConfig::default()).await;
        assert_eq!(store.name(), "noop");
    }

    #[tokio::test]
    async fn memory_backend_is_in_process() {
        let store = connect_store(&CacheConfig::memory()).await;
        assert_eq!(store.name(), "memory");
    }

    #[tokio::test]
    async fn redis_without_url_falls_back() {
        let config = CacheConfig {
            backend: CacheBackend::Redis,
            ..CacheConfig::default()
        };
        assert_eq!(connect_store(&config).await.name(), "noop");
    }

    #[tokio::test]
    async fn malformed_redis_url_falls_back() {
        let config = CacheConfig {
            backend: CacheBackend::Redis,
            url: Some("not a redis url".to_string()),
            ..CacheConfig::default()
        };
        assert_eq!(connect_store(&config).await.name(), "noop");
    }

    #[tokio::test]
    async fn refused_redis_connection_falls_back_quickly() {
        let config = CacheConfig {
            backend: CacheBackend::Redis,
            url: Some("redis://127.0.0.1:1".to_string()),
            ..CacheConfig::default()
        };

        let started = std::time::Instant::now();
        let store = connect_store(&config).await;

        assert_eq!(store.name(), "noop");
        assert!(
            started.elapsed() < CONNECT_TIMEOUT,
            "fallback took {:?}",
            started.elapsed()
        );
    }
}
