//! Shared adapters and app builders for integration tests.

#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use tokio::sync::Barrier;

use user_mapping::Trace;
use user_mapping::domain::ports::{
    UserMappingCache, UserMappingCacheError, UserMappingCacheKey, UserMappingRepository,
    UserMappingRepositoryError,
};
use user_mapping::domain::{NewUserMapping, UserMapping, UserMappingService};
use user_mapping::inbound::http::api_scope;
use user_mapping::inbound::http::state::HttpState;
use user_mapping::outbound::identity::UuidUserIdGenerator;
use user_mapping::outbound::memory::{InMemoryUserMappingCache, InMemoryUserMappingRepository};

/// Engine over the given store and cache with the UUID generator.
pub type TestService<R, C> = UserMappingService<R, C, UuidUserIdGenerator>;

/// Engine wired to fresh in-memory adapters.
pub fn in_memory_service(
    repository: Arc<InMemoryUserMappingRepository>,
    cache: Arc<InMemoryUserMappingCache>,
) -> TestService<InMemoryUserMappingRepository, InMemoryUserMappingCache> {
    UserMappingService::new(repository, cache, Arc::new(UuidUserIdGenerator))
}

/// App exposing the API with tracing, as the server wires it.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(api_scope())
}

/// Store whose every call fails with a connection error.
pub struct UnreachableRepository;

#[async_trait]
impl UserMappingRepository for UnreachableRepository {
    async fn find_by_unordered_pair(
        &self,
        _a: &str,
        _b: &str,
    ) -> Result<Option<UserMapping>, UserMappingRepositoryError> {
        Err(UserMappingRepositoryError::connection("connection refused"))
    }

    async fn insert(
        &self,
        _mapping: &NewUserMapping,
    ) -> Result<UserMapping, UserMappingRepositoryError> {
        Err(UserMappingRepositoryError::connection("connection refused"))
    }
}

/// Cache whose every call fails.
pub struct UnreachableCache;

#[async_trait]
impl UserMappingCache for UnreachableCache {
    async fn get(
        &self,
        _key: &UserMappingCacheKey,
    ) -> Result<Option<String>, UserMappingCacheError> {
        Err(UserMappingCacheError::backend("connection reset"))
    }

    async fn set(
        &self,
        _key: &UserMappingCacheKey,
        _value: &str,
        _ttl: Duration,
    ) -> Result<(), UserMappingCacheError> {
        Err(UserMappingCacheError::backend("connection reset"))
    }
}

/// In-memory store that holds the first `gated` lookups at a barrier so
/// every caller misses before any of them inserts.
pub struct GatedRepository {
    inner: InMemoryUserMappingRepository,
    barrier: Barrier,
    gated: AtomicUsize,
    inserts: AtomicUsize,
}

impl GatedRepository {
    /// Gate the first `callers` lookups.
    pub fn new(callers: usize) -> Self {
        Self {
            inner: InMemoryUserMappingRepository::default(),
            barrier: Barrier::new(callers),
            gated: AtomicUsize::new(callers),
            inserts: AtomicUsize::new(0),
        }
    }

    /// Stored mappings.
    pub fn mappings(&self) -> Vec<UserMapping> {
        self.inner.mappings().expect("in-memory snapshot")
    }

    /// Number of insert attempts seen.
    pub fn insert_attempts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserMappingRepository for GatedRepository {
    async fn find_by_unordered_pair(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Option<UserMapping>, UserMappingRepositoryError> {
        let gated = self
            .gated
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        let found = self.inner.find_by_unordered_pair(a, b).await;
        if gated {
            self.barrier.wait().await;
        }
        found
    }

    async fn insert(
        &self,
        mapping: &NewUserMapping,
    ) -> Result<UserMapping, UserMappingRepositoryError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(mapping).await
    }
}
