//! Domain primitives, ports and the user mapping resolution engine.
//!
//! Purpose: keep the find-or-create rules for pair mappings independent of
//! HTTP, PostgreSQL and Redis. Adapters plug in through the traits in
//! [`ports`].
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failure payload.
//! - [`UserId`], [`UserMapping`], [`NewUserMapping`]: records and tokens.
//! - [`UserMappingService`]: the cache, store, create resolution engine.
//! - [`TraceId`]: request-scoped correlation identifier.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user_mapping;
pub mod user_mapping_service;

pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::user_mapping::{
    EXTERNAL_ID_MAX_LEN, NewUserMapping, UserId, UserMapping, UserMappingValidationError,
};
pub use self::user_mapping_service::{DEFAULT_CACHE_TTL, ResolveError, UserMappingService};
