//! PostgreSQL-backed `UserMappingRepository`.
//!
//! Pair uniqueness is enforced by the `user_mappings_unordered_pair_key`
//! expression index over `(LEAST(id1, id2), GREATEST(id1, id2))`. A unique
//! violation on that index is the signal that a concurrent caller won the
//! insert and is reported as [`UserMappingRepositoryError::DuplicatePair`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserMappingRepository, UserMappingRepositoryError};
use crate::domain::{NewUserMapping, UserId, UserMapping};

use super::models::{NewUserMappingRow, UserMappingRow};
use super::pool::{DbPool, PoolError};
use super::schema::user_mappings;

/// Name of the unique index over the unordered pair.
pub const UNORDERED_PAIR_INDEX: &str = "user_mappings_unordered_pair_key";
/// Name of the unique constraint over `user_id`.
pub const USER_ID_CONSTRAINT: &str = "user_mappings_user_id_key";

/// Diesel implementation of the mapping store.
#[derive(Clone)]
pub struct DieselUserMappingRepository {
    pool: DbPool,
}

impl DieselUserMappingRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserMappingRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserMappingRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserMappingRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserMappingRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => {
            UserMappingRepositoryError::query("database query error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            if info.constraint_name() == Some(USER_ID_CONSTRAINT) {
                UserMappingRepositoryError::query("user id already assigned")
            } else {
                UserMappingRepositoryError::duplicate_pair("mapping for pair already exists")
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserMappingRepositoryError::connection("database connection error")
        }
        _ => UserMappingRepositoryError::query("database error"),
    }
}

fn row_to_mapping(row: UserMappingRow) -> Result<UserMapping, UserMappingRepositoryError> {
    let user_id = UserId::new(row.user_id).map_err(|err| {
        UserMappingRepositoryError::query(format!("corrupted user id in database: {err}"))
    })?;
    Ok(UserMapping {
        id: row.id,
        id1: row.id1,
        id2: row.id2,
        user_id,
        created_at: row.created_at,
    })
}

#[async_trait]
impl UserMappingRepository for DieselUserMappingRepository {
    async fn find_by_unordered_pair(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Option<UserMapping>, UserMappingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserMappingRow> = user_mappings::table
            .filter(
                user_mappings::id1
                    .eq(a)
                    .and(user_mappings::id2.eq(b))
                    .or(user_mappings::id1.eq(b).and(user_mappings::id2.eq(a))),
            )
            .select(UserMappingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_mapping).transpose()
    }

    async fn insert(
        &self,
        mapping: &NewUserMapping,
    ) -> Result<UserMapping, UserMappingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserMappingRow {
            id: Uuid::new_v4(),
            id1: &mapping.id1,
            id2: &mapping.id2,
            user_id: mapping.user_id.as_str(),
        };

        let row = diesel::insert_into(user_mappings::table)
            .values(&new_row)
            .returning(UserMappingRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_mapping(row)
    }
}
