//! Port interface for the expiring user mapping cache.
use std::time::Duration;

use async_trait::async_trait;

use super::{UserMappingCacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by cache adapters.
    pub enum UserMappingCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "user mapping cache backend failure: {message}",
    }
}

/// Advisory key-value cache in front of the repository.
///
/// Entries are derived data. Callers treat a read error exactly like a
/// miss, so adapters should report failures rather than hide them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserMappingCache: Send + Sync {
    /// Read the cached token for `key`.
    async fn get(&self, key: &UserMappingCacheKey)
    -> Result<Option<String>, UserMappingCacheError>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set(
        &self,
        key: &UserMappingCacheKey,
        value: &str,
        ttl: Duration,
    ) -> Result<(), UserMappingCacheError>;
}
