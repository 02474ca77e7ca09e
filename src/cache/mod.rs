//! Response cache for the lookup endpoints.
//!
//! Successful listing responses are stored in an external key-value store
//! (Redis) keyed by request URL and expire after a fixed TTL. The store is
//! optional: when it is disabled or unreachable every request is computed
//! from the in-memory reference data.
//!
//! ```toml
//! [cache]
//! backend = "redis"
//! url = "redis://127.0.0.1:6379"
//! ttl_seconds = 3600
//! timeout_ms = 250
//! ```

mod config;
mod connect;
mod coordinator;
mod error;
mod keys;
mod lock;
mod redis_store;
mod store;

pub use config::{CacheBackend, CacheConfig};
pub use connect::connect_store;
pub use coordinator::{
    CacheAside, CacheOutcome, METRIC_CACHE_BYPASS, METRIC_CACHE_ERROR, METRIC_CACHE_HIT,
    METRIC_CACHE_MISS, METRIC_CACHE_STORE, Resolved,
};
pub use error::CacheError;
pub use keys::CacheKey;
pub use redis_store::RedisCacheStore;
pub use store::{CacheStore, MemoryCacheStore, NoOpCacheStore};
