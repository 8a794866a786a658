//! User mapping resolution engine.
//!
//! [`UserMappingService`] answers "which token belongs to this pair?" by
//! walking three tiers in strict sequence:
//!
//! 1. The cache, keyed on the pair as supplied. A non-empty hit returns
//!    immediately without touching the store.
//! 2. The repository, matched on the unordered pair. A hit is written back
//!    to the cache.
//! 3. Creation: a fresh token is minted and inserted. If a concurrent caller
//!    won the insert, the store reports a duplicate pair and the winner's
//!    record is re-read instead.
//!
//! Cache failures never reach the caller; they degrade to a miss or a
//! skipped write. Store and generator failures are fatal.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::ports::{
    UserIdGenerationError, UserIdGenerator, UserMappingCache, UserMappingCacheKey,
    UserMappingRepository, UserMappingRepositoryError, UserMappingResolver,
};
use super::{Error, NewUserMapping, UserId};

/// Default lifetime of cache entries written by the engine.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Failures surfaced by [`UserMappingService::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// An identifier was empty.
    #[error("{field} must not be empty")]
    InvalidArgument {
        /// Name of the offending argument.
        field: &'static str,
    },
    /// The durable store could not be read or written.
    #[error("user mapping store unavailable: {0}")]
    StoreUnavailable(UserMappingRepositoryError),
    /// No token could be minted.
    #[error(transparent)]
    GenerationFailure(#[from] UserIdGenerationError),
}

impl From<UserMappingRepositoryError> for ResolveError {
    fn from(value: UserMappingRepositoryError) -> Self {
        Self::StoreUnavailable(value)
    }
}

impl From<ResolveError> for Error {
    fn from(value: ResolveError) -> Self {
        match value {
            ResolveError::InvalidArgument { .. } => Self::invalid_request(value.to_string()),
            ResolveError::StoreUnavailable(_) => {
                Self::service_unavailable("user mapping store unavailable")
            }
            ResolveError::GenerationFailure(_) => Self::internal("user id generation failed"),
        }
    }
}

/// Find-or-create engine for pair mappings.
///
/// Collaborators are injected at construction; the engine holds no global
/// state and can be shared across requests behind an `Arc`.
pub struct UserMappingService<R: ?Sized, C: ?Sized, G: ?Sized> {
    repository: Arc<R>,
    cache: Arc<C>,
    generator: Arc<G>,
    cache_ttl: Duration,
}

impl<R, C, G> UserMappingService<R, C, G>
where
    R: UserMappingRepository + ?Sized,
    C: UserMappingCache + ?Sized,
    G: UserIdGenerator + ?Sized,
{
    /// Create an engine writing cache entries with [`DEFAULT_CACHE_TTL`].
    pub fn new(repository: Arc<R>, cache: Arc<C>, generator: Arc<G>) -> Self {
        Self {
            repository,
            cache,
            generator,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Override the lifetime of cache entries.
    #[must_use]
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    /// Lifetime applied to cache writes.
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Return the token for `{id1, id2}`, creating the mapping on first use.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidArgument`] when either identifier is empty.
    /// - [`ResolveError::StoreUnavailable`] when the repository fails.
    /// - [`ResolveError::GenerationFailure`] when no token can be minted.
    pub async fn resolve(&self, id1: &str, id2: &str) -> Result<UserId, ResolveError> {
        ensure_present("id1", id1)?;
        ensure_present("id2", id2)?;

        let cache_key = UserMappingCacheKey::pack(id1, id2);
        if let Some(user_id) = self.read_cache(&cache_key).await {
            debug!(cache_key = %cache_key, "user mapping cache hit");
            return Ok(user_id);
        }
        debug!(cache_key = %cache_key, "user mapping cache miss");

        let user_id = match self.repository.find_by_unordered_pair(id1, id2).await? {
            Some(existing) => existing.user_id,
            None => self.create_mapping(id1, id2).await?,
        };

        self.write_cache(&cache_key, &user_id).await;
        Ok(user_id)
    }

    async fn create_mapping(&self, id1: &str, id2: &str) -> Result<UserId, ResolveError> {
        let user_id = self.generator.generate()?;
        let new_mapping = NewUserMapping::new(id1, id2, user_id);

        match self.repository.insert(&new_mapping).await {
            Ok(created) => {
                info!(mapping_id = %created.id, user_id = %created.user_id, "created user mapping");
                Ok(created.user_id)
            }
            Err(UserMappingRepositoryError::DuplicatePair { message }) => {
                warn!(%message, "concurrent insert for pair; re-reading winner");
                self.handle_duplicate_pair_race(id1, id2).await
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn handle_duplicate_pair_race(
        &self,
        id1: &str,
        id2: &str,
    ) -> Result<UserId, ResolveError> {
        self.repository
            .find_by_unordered_pair(id1, id2)
            .await?
            .map(|existing| existing.user_id)
            .ok_or_else(|| {
                ResolveError::StoreUnavailable(UserMappingRepositoryError::query(
                    "duplicate pair reported but no mapping found on re-read",
                ))
            })
    }

    async fn read_cache(&self, key: &UserMappingCacheKey) -> Option<UserId> {
        match self.cache.get(key).await {
            Ok(Some(value)) => UserId::new(value).ok(),
            Ok(None) => None,
            Err(err) => {
                warn!(cache_key = %key, error = %err, "cache read failed; treating as miss");
                None
            }
        }
    }

    async fn write_cache(&self, key: &UserMappingCacheKey, user_id: &UserId) {
        if let Err(err) = self.cache.set(key, user_id.as_str(), self.cache_ttl).await {
            warn!(cache_key = %key, error = %err, "cache write failed; continuing");
        }
    }
}

fn ensure_present(field: &'static str, value: &str) -> Result<(), ResolveError> {
    if value.is_empty() {
        return Err(ResolveError::InvalidArgument { field });
    }
    Ok(())
}

#[async_trait]
impl<R, C, G> UserMappingResolver for UserMappingService<R, C, G>
where
    R: UserMappingRepository + ?Sized,
    C: UserMappingCache + ?Sized,
    G: UserIdGenerator + ?Sized,
{
    async fn resolve(&self, id1: &str, id2: &str) -> Result<UserId, ResolveError> {
        Self::resolve(self, id1, id2).await
    }
}

#[cfg(test)]
mod tests;
