//! PostgreSQL persistence adapters using Diesel.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module; only the repository and pool are exported.
//!
//! ```ignore
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/user_mapping")).await?;
//! let repository = DieselUserMappingRepository::new(pool);
//! ```

mod diesel_user_mapping_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_mapping_repository::{
    DieselUserMappingRepository, UNORDERED_PAIR_INDEX, USER_ID_CONSTRAINT,
};
pub use pool::{DbPool, PoolConfig, PoolError};
