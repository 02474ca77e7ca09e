//! Redis-backed cache store.

use std::time::Duration;

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

use super::{error::CacheError, store::CacheStore};

/// Retries after a failed connect, at startup or after a dropped connection.
const CONNECT_RETRIES: usize = 1;
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(1);
const RETRY_MAX_DELAY_MS: u64 = 200;

/// Shared Redis connection; the manager reconnects on its own after drops.
#[derive(Clone)]
pub struct RedisCacheStore {
    manager: ConnectionManager,
}

impl RedisCacheStore {
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url).map_err(|err| CacheError::connection(err.to_string()))?;
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(CONNECT_RETRIES)
            .set_max_delay(RETRY_MAX_DELAY_MS)
            .set_connection_timeout(CONNECTION_TIMEOUT);
        let manager = client
            .get_connection_manager_with_config(config)
            .await
            .map_err(|err| CacheError::connection(err.to_string()))?;
        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|err| CacheError::command("get", err.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(|err| CacheError::command("set", err.to_string()))
    }
}
