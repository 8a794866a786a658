//! Outbound adapters implementing the domain ports.
//!
//! - **persistence**: PostgreSQL mapping store via Diesel
//! - **cache**: Redis cache via `bb8-redis`
//! - **memory**: process-local store and cache used when no URLs are set
//! - **identity**: UUID token generator
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no resolution logic.

pub mod cache;
pub mod identity;
pub mod memory;
pub mod persistence;
