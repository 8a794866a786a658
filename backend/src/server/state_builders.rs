//! Builders wiring adapters into the resolution engine.

use std::sync::Arc;

use tracing::warn;

use user_mapping::domain::UserMappingService;
use user_mapping::domain::ports::{UserMappingCache, UserMappingRepository, UserMappingResolver};
use user_mapping::inbound::http::state::HttpState;
use user_mapping::outbound::identity::UuidUserIdGenerator;
use user_mapping::outbound::memory::{InMemoryUserMappingCache, InMemoryUserMappingRepository};
use user_mapping::outbound::persistence::DieselUserMappingRepository;

use super::ServerConfig;

fn build_repository(config: &ServerConfig) -> Arc<dyn UserMappingRepository> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselUserMappingRepository::new(pool.clone())),
        None => {
            warn!("no database configured; mappings are held in memory and lost on restart");
            Arc::new(InMemoryUserMappingRepository::default())
        }
    }
}

fn build_cache(config: &ServerConfig) -> Arc<dyn UserMappingCache> {
    match &config.redis_cache {
        Some(cache) => Arc::new(cache.clone()),
        None => {
            warn!("no redis configured; using a process-local cache");
            Arc::new(InMemoryUserMappingCache::new())
        }
    }
}

/// Build the resolution engine from the configured adapters.
pub(crate) fn build_resolver(config: &ServerConfig) -> Arc<dyn UserMappingResolver> {
    let service = UserMappingService::new(
        build_repository(config),
        build_cache(config),
        Arc::new(UuidUserIdGenerator),
    )
    .with_cache_ttl(config.cache_ttl);
    Arc::new(service)
}

/// Build the HTTP handler state.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    HttpState::new(build_resolver(config))
}
