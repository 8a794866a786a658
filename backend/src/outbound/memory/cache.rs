//! In-memory `UserMappingCache` with per-entry expiry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::ports::{UserMappingCache, UserMappingCacheError, UserMappingCacheKey};

#[derive(Debug, Clone)]
struct CachedEntry {
    value: String,
    /// `None` when the TTL runs past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl CachedEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Expiring string map standing in for Redis.
///
/// Expired entries are dropped lazily on read.
#[derive(Debug, Default)]
pub struct InMemoryUserMappingCache {
    entries: Mutex<HashMap<String, CachedEntry>>,
}

impl InMemoryUserMappingCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, including expired ones not yet
    /// evicted.
    ///
    /// # Errors
    ///
    /// Returns [`UserMappingCacheError::Backend`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, UserMappingCacheError> {
        Ok(self.lock()?.len())
    }

    /// Whether the cache holds no entries.
    ///
    /// # Errors
    ///
    /// Returns [`UserMappingCacheError::Backend`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, UserMappingCacheError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, CachedEntry>>, UserMappingCacheError> {
        self.entries
            .lock()
            .map_err(|_| UserMappingCacheError::backend("in-memory cache lock poisoned"))
    }
}

#[async_trait]
impl UserMappingCache for InMemoryUserMappingCache {
    async fn get(
        &self,
        key: &UserMappingCacheKey,
    ) -> Result<Option<String>, UserMappingCacheError> {
        let mut entries = self.lock()?;
        let now = Instant::now();
        match entries.get(key.as_str()) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key.as_str());
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &UserMappingCacheKey,
        value: &str,
        ttl: Duration,
    ) -> Result<(), UserMappingCacheError> {
        let entry = CachedEntry {
            value: value.to_owned(),
            expires_at: Instant::now().checked_add(ttl),
        };
        self.lock()?.insert(key.as_str().to_owned(), entry);
        Ok(())
    }
}
