//! In-memory `UserMappingRepository`.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use uuid::Uuid;

use crate::domain::ports::{UserMappingRepository, UserMappingRepositoryError};
use crate::domain::{NewUserMapping, UserMapping};

/// Repository holding mappings in a locked vector.
///
/// The uniqueness check and the push happen under one lock, so concurrent
/// inserts of the same unordered pair see exactly one winner.
pub struct InMemoryUserMappingRepository {
    mappings: Mutex<Vec<UserMapping>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryUserMappingRepository {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryUserMappingRepository {
    /// Create an empty repository stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            mappings: Mutex::new(Vec::new()),
            clock,
        }
    }

    /// Snapshot of every stored mapping, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`UserMappingRepositoryError::Query`] if the lock is poisoned.
    pub fn mappings(&self) -> Result<Vec<UserMapping>, UserMappingRepositoryError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<UserMapping>>, UserMappingRepositoryError> {
        self.mappings
            .lock()
            .map_err(|_| UserMappingRepositoryError::query("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl UserMappingRepository for InMemoryUserMappingRepository {
    async fn find_by_unordered_pair(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Option<UserMapping>, UserMappingRepositoryError> {
        let mappings = self.lock()?;
        Ok(mappings.iter().find(|m| m.matches_pair(a, b)).cloned())
    }

    async fn insert(
        &self,
        mapping: &NewUserMapping,
    ) -> Result<UserMapping, UserMappingRepositoryError> {
        let mut mappings = self.lock()?;
        if mappings
            .iter()
            .any(|m| m.matches_pair(&mapping.id1, &mapping.id2))
        {
            return Err(UserMappingRepositoryError::duplicate_pair(format!(
                "{}:{}",
                mapping.id1, mapping.id2
            )));
        }
        if mappings.iter().any(|m| m.user_id == mapping.user_id) {
            return Err(UserMappingRepositoryError::query("user id already assigned"));
        }

        let created = UserMapping {
            id: Uuid::new_v4(),
            id1: mapping.id1.clone(),
            id2: mapping.id2.clone(),
            user_id: mapping.user_id.clone(),
            created_at: self.clock.utc(),
        };
        mappings.push(created.clone());
        Ok(created)
    }
}
