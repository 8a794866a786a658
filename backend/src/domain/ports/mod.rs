//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod user_id_generator;
mod user_mapping_cache;
mod user_mapping_repository;
mod user_mapping_resolver;

pub use cache_key::{USER_MAPPING_CACHE_PREFIX, UserMappingCacheKey};
#[cfg(test)]
pub use user_id_generator::MockUserIdGenerator;
pub use user_id_generator::{UserIdGenerationError, UserIdGenerator};
#[cfg(test)]
pub use user_mapping_cache::MockUserMappingCache;
pub use user_mapping_cache::{UserMappingCache, UserMappingCacheError};
#[cfg(test)]
pub use user_mapping_repository::MockUserMappingRepository;
pub use user_mapping_repository::{UserMappingRepository, UserMappingRepositoryError};
#[cfg(test)]
pub use user_mapping_resolver::MockUserMappingResolver;
pub use user_mapping_resolver::UserMappingResolver;
