//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use user_mapping::domain::DEFAULT_CACHE_TTL;
use user_mapping::outbound::cache::{RedisCacheConfig, RedisUserMappingCache};
use user_mapping::outbound::persistence::{DbPool, PoolConfig};
use user_mapping::settings::UserMappingSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) redis_cache: Option<RedisUserMappingCache>,
    pub(crate) cache_ttl: Duration,
}

impl ServerConfig {
    /// Configuration using in-memory adapters and the default cache TTL.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            redis_cache: None,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Build pools for every configured backing service.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] when the bind address is invalid or a pool
    /// cannot be built; startup aborts in that case.
    pub async fn from_settings(settings: &UserMappingSettings) -> std::io::Result<Self> {
        let mut config = Self::new(settings.bind_addr()?).with_cache_ttl(settings.cache_ttl());

        if let Some(url) = settings.database_url() {
            let pool_config =
                PoolConfig::new(url).with_max_size(settings.database_max_connections());
            let pool = DbPool::new(pool_config).await.map_err(|err| {
                std::io::Error::other(format!("database pool initialisation failed: {err}"))
            })?;
            pool.get().await.map_err(|err| {
                std::io::Error::other(format!("database unreachable at startup: {err}"))
            })?;
            config = config.with_db_pool(pool);
        }

        if let Some(url) = settings.redis_url() {
            let cache = RedisUserMappingCache::connect(RedisCacheConfig::new(url))
                .await
                .map_err(|err| {
                    std::io::Error::other(format!("redis pool initialisation failed: {err}"))
                })?;
            cache.check().await.map_err(|err| {
                std::io::Error::other(format!("redis unreachable at startup: {err}"))
            })?;
            config = config.with_redis_cache(cache);
        }

        Ok(config)
    }

    /// Attach a database pool; the Diesel repository replaces the in-memory one.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach a Redis cache; it replaces the in-memory cache.
    #[must_use]
    pub fn with_redis_cache(mut self, cache: RedisUserMappingCache) -> Self {
        self.redis_cache = Some(cache);
        self
    }

    /// Override the cache entry lifetime.
    #[must_use]
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    /// Socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
