//! Cache-aside resolution.
//!
//! A hit returns the stored payload without running `compute`. A miss runs
//! `compute` and stores only successful payloads. Store failures and timeouts
//! are logged and counted, never surfaced to the caller.

use std::{sync::Arc, time::Duration};

use metrics::counter;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::application::resolver::Payload;

use super::{
    config::CacheConfig,
    error::CacheError,
    keys::CacheKey,
    store::CacheStore,
};

pub const METRIC_CACHE_HIT: &str = "bestiary_cache_hit_total";
pub const METRIC_CACHE_MISS: &str = "bestiary_cache_miss_total";
pub const METRIC_CACHE_BYPASS: &str = "bestiary_cache_bypass_total";
pub const METRIC_CACHE_STORE: &str = "bestiary_cache_store_total";
pub const METRIC_CACHE_ERROR: &str = "bestiary_cache_error_total";

const SOURCE: &str = "bestiary::cache";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
    /// The request was never looked up or stored.
    Bypass,
}

impl CacheOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Bypass => "bypass",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub payload: Payload,
    pub outcome: CacheOutcome,
}

#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    timeout: Duration,
}

impl CacheAside {
    pub fn new(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            ttl: config.ttl,
            timeout: config.timeout,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.store.name()
    }

    pub async fn resolve<F, E>(&self, key: &CacheKey, compute: F) -> Result<Resolved, E>
    where
        F: FnOnce() -> Result<Payload, E>,
    {
        if let Some(body) = self.read(key).await {
            counter!(METRIC_CACHE_HIT).increment(1);
            debug!(
                target = SOURCE,
                backend = self.backend(),
                key = %key,
                outcome = "hit",
                "Served from cache"
            );
            return Ok(Resolved {
                payload: Payload::from_cached(body),
                outcome: CacheOutcome::Hit,
            });
        }

        counter!(METRIC_CACHE_MISS).increment(1);
        let payload = compute()?;
        self.write(key, &payload).await;

        Ok(Resolved {
            payload,
            outcome: CacheOutcome::Miss,
        })
    }

    /// Compute directly without touching the store.
    pub fn bypass<F, E>(&self, compute: F) -> Result<Resolved, E>
    where
        F: FnOnce() -> Result<Payload, E>,
    {
        counter!(METRIC_CACHE_BYPASS).increment(1);
        compute().map(|payload| Resolved {
            payload,
            outcome: CacheOutcome::Bypass,
        })
    }

    async fn read(&self, key: &CacheKey) -> Option<String> {
        match timeout(self.timeout, self.store.get(key.as_str())).await {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                self.record_error(key, &err);
                None
            }
            Err(_) => {
                self.record_error(key, &self.timed_out("get"));
                None
            }
        }
    }

    async fn write(&self, key: &CacheKey, payload: &Payload) {
        let write = self.store.set(key.as_str(), payload.as_str(), self.ttl);
        match timeout(self.timeout, write).await {
            Ok(Ok(())) => {
                counter!(METRIC_CACHE_STORE).increment(1);
                debug!(
                    target = SOURCE,
                    backend = self.backend(),
                    key = %key,
                    ttl_seconds = self.ttl.as_secs(),
                    "Stored response in cache"
                );
            }
            Ok(Err(err)) => self.record_error(key, &err),
            Err(_) => self.record_error(key, &self.timed_out("set")),
        }
    }

    fn timed_out(&self, op: &'static str) -> CacheError {
        CacheError::Timeout {
            op,
            after_ms: self.timeout.as_millis() as u64,
        }
    }

    fn record_error(&self, key: &CacheKey, error: &CacheError) {
        let op = match error {
            CacheError::Command { op, .. } | CacheError::Timeout { op, .. } => *op,
            CacheError::Connection(_) => "connect",
        };
        counter!(METRIC_CACHE_ERROR, "op" => op).increment(1);
        warn!(
            target = SOURCE,
            backend = self.backend(),
            key = %key,
            op,
            error = %error,
            "Cache unavailable; serving without it"
        );
    }
}
