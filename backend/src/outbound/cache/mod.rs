//! Redis-backed `UserMappingCache`.
//!
//! Connections come from a `bb8-redis` pool. Values are stored as plain
//! strings under the packed pair key with `SET ... EX`, so entries expire
//! server-side. All failures surface as [`UserMappingCacheError::Backend`];
//! the engine decides whether to absorb them.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::redis::AsyncCommands;
use tracing::debug;

use crate::domain::ports::{UserMappingCache, UserMappingCacheError, UserMappingCacheKey};

/// Pool settings for the Redis cache.
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl RedisCacheConfig {
    /// Configuration for `url` with a pool of 8 and a 2 second checkout
    /// timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_size: 8,
            connection_timeout: Duration::from_secs(2),
        }
    }

    /// Set the maximum number of pooled connections.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set how long a checkout may wait before failing.
    #[must_use]
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Redis connection URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Cache adapter storing tokens in Redis.
#[derive(Clone)]
pub struct RedisUserMappingCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisUserMappingCache {
    /// Build the connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`UserMappingCacheError::Backend`] when the URL is invalid or
    /// the pool cannot be built.
    pub async fn connect(config: RedisCacheConfig) -> Result<Self, UserMappingCacheError> {
        let manager = RedisConnectionManager::new(config.url.as_str())
            .map_err(|err| UserMappingCacheError::backend(err.to_string()))?;
        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| UserMappingCacheError::backend(err.to_string()))?;
        Ok(Self { pool })
    }

    /// Check out one connection to prove the server is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`UserMappingCacheError::Backend`] when no connection can be
    /// obtained within the checkout timeout.
    pub async fn check(&self) -> Result<(), UserMappingCacheError> {
        self.connection().await.map(drop)
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, UserMappingCacheError> {
        self.pool
            .get()
            .await
            .map_err(|err| UserMappingCacheError::backend(err.to_string()))
    }
}

/// Redis rejects `EX 0`; clamp to one second.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl UserMappingCache for RedisUserMappingCache {
    async fn get(
        &self,
        key: &UserMappingCacheKey,
    ) -> Result<Option<String>, UserMappingCacheError> {
        let mut conn = self.connection().await?;
        conn.get::<_, Option<String>>(key.as_str())
            .await
            .map_err(|err| UserMappingCacheError::backend(err.to_string()))
    }

    async fn set(
        &self,
        key: &UserMappingCacheKey,
        value: &str,
        ttl: Duration,
    ) -> Result<(), UserMappingCacheError> {
        let ttl_secs = ttl_seconds(ttl);
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key.as_str(), value, ttl_secs)
            .await
            .map_err(|err| UserMappingCacheError::backend(err.to_string()))?;
        debug!(cache_key = %key, ttl_secs, "cached user mapping");
        Ok(())
    }
}
