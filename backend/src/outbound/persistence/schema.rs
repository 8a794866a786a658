//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `migrations/` exactly. The unordered-pair uniqueness
//! lives in an expression index that Diesel cannot describe; see
//! `UNORDERED_PAIR_INDEX` in the repository module.

diesel::table! {
    /// Stable pair-to-token mappings.
    user_mappings (id) {
        /// Row identifier (UUID v4).
        id -> Uuid,
        /// First identifier, as supplied by the creating caller.
        id1 -> Varchar,
        /// Second identifier, as supplied by the creating caller.
        id2 -> Varchar,
        /// Opaque token assigned to the pair; unique.
        user_id -> Varchar,
        /// Insertion timestamp.
        created_at -> Timestamptz,
    }
}
