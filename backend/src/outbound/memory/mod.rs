//! Process-local adapters backed by in-memory collections.
//!
//! These satisfy the same port contracts as the PostgreSQL and Redis
//! adapters (pair uniqueness, expiring entries) and are used when no
//! database or Redis URL is configured, and by tests.

mod cache;
mod repository;

pub use cache::InMemoryUserMappingCache;
pub use repository::InMemoryUserMappingRepository;
