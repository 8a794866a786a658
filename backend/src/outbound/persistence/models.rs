//! Internal Diesel row structs for the `user_mappings` table.
//!
//! These never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::user_mappings;

/// Row read from `user_mappings`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_mappings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserMappingRow {
    pub id: Uuid,
    pub id1: String,
    pub id2: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable row; `created_at` is filled by the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_mappings)]
pub(crate) struct NewUserMappingRow<'a> {
    pub id: Uuid,
    pub id1: &'a str,
    pub id2: &'a str,
    pub user_id: &'a str,
}
