//! Cache configuration.

use std::{fmt, num::NonZeroUsize, str::FromStr, time::Duration};

const DEFAULT_TTL_SECONDS: u64 = 3600;
const DEFAULT_TIMEOUT_MS: u64 = 250;
const DEFAULT_MEMORY_CAPACITY: usize = 1024;

/// Which store backs the response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
    Disabled,
}

impl CacheBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBackend::Redis => "redis",
            CacheBackend::Memory => "memory",
            CacheBackend::Disabled => "disabled",
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            "disabled" | "none" | "off" => Ok(CacheBackend::Disabled),
            other => Err(format!(
                "unknown cache backend `{other}`; expected redis, memory or disabled"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Connection URL, required for the Redis backend.
    pub url: Option<String>,
    /// Expiry applied to every stored entry.
    pub ttl: Duration,
    /// Upper bound for a single cache round trip.
    pub timeout: Duration,
    /// Entry limit for the in-process backend.
    pub memory_capacity: NonZeroUsize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Disabled,
            url: None,
            ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            memory_capacity: NonZeroUsize::new(DEFAULT_MEMORY_CAPACITY)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            backend: settings.backend,
            url: settings.url.clone(),
            ttl: Duration::from_secs(settings.ttl_seconds.get()),
            timeout: Duration::from_millis(settings.timeout_ms.get()),
            memory_capacity: settings.memory_capacity,
        }
    }
}

impl CacheConfig {
    /// In-process cache with default limits, handy for tests and local runs.
    pub fn memory() -> Self {
        Self {
            backend: CacheBackend::Memory,
            ..Self::default()
        }
    }
}
