//! Stable user tokens for unordered pairs of external identifiers.
//!
//! The crate is laid out as ports and adapters: [`domain`] holds the types,
//! ports and the resolution engine; [`inbound`] exposes it over HTTP;
//! [`outbound`] provides PostgreSQL, Redis and in-memory adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
