//! Driving port consumed by inbound adapters to resolve a pair.
use async_trait::async_trait;

use crate::domain::{ResolveError, UserId};

/// Find-or-create entry point for `(id1, id2)` pairs.
///
/// HTTP handlers depend on this trait rather than on the concrete engine so
/// they can be exercised with mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserMappingResolver: Send + Sync {
    /// Return the token for the unordered pair, creating it on first sight.
    async fn resolve(&self, id1: &str, id2: &str) -> Result<UserId, ResolveError>;
}
