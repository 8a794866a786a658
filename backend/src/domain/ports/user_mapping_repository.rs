//! Port abstraction for durable user mapping storage.
//!
//! The store is the single source of truth. It must reject a second record
//! for the same unordered pair with [`UserMappingRepositoryError::DuplicatePair`]
//! so concurrent first-time resolutions converge on one mapping.

use async_trait::async_trait;

use crate::domain::{NewUserMapping, UserMapping};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user mapping repository adapters.
    pub enum UserMappingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user mapping repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user mapping repository query failed: {message}",
        /// The unordered pair already has a mapping (concurrent insert race).
        DuplicatePair { message: String } => "user mapping already exists for pair: {message}",
    }
}

/// Durable lookup and insert-if-absent for pair mappings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserMappingRepository: Send + Sync {
    /// Find the mapping whose stored pair equals `(a, b)` or `(b, a)`.
    ///
    /// Returns at most one record; uniqueness is enforced on insert.
    async fn find_by_unordered_pair(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Option<UserMapping>, UserMappingRepositoryError>;

    /// Persist a new mapping exactly as supplied.
    ///
    /// Fails with [`UserMappingRepositoryError::DuplicatePair`] when a record
    /// for the same unordered pair already exists.
    async fn insert(
        &self,
        mapping: &NewUserMapping,
    ) -> Result<UserMapping, UserMappingRepositoryError>;
}
