//! User mapping records and the opaque user token.
//!
//! A mapping ties an unordered pair of external identifiers to a single
//! [`UserId`]. The pair is stored in the order it was first supplied, but
//! (a, b) and (b, a) denote the same logical pair.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on the length of an external identifier, in characters.
pub const EXTERNAL_ID_MAX_LEN: usize = 50;

/// Validation errors raised by user mapping constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserMappingValidationError {
    /// The user token was empty.
    #[error("user id must not be empty")]
    EmptyUserId,
}

/// Opaque token assigned to an unordered identifier pair.
///
/// The token is treated as an uninterpreted string: adapters may hand back
/// whatever was minted by the configured generator.
///
/// # Examples
/// ```
/// use user_mapping::domain::UserId;
///
/// let id = UserId::new("4e31ab8e-3328-44b1-be33-f30c82f4bc32").expect("non-empty");
/// assert_eq!(id.as_str(), "4e31ab8e-3328-44b1-be33-f30c82f4bc32");
/// assert!(UserId::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap a token.
    pub fn new(value: impl Into<String>) -> Result<Self, UserMappingValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(UserMappingValidationError::EmptyUserId);
        }
        Ok(Self(value))
    }

    /// Borrow the token.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserMappingValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Durable mapping record.
///
/// ## Invariants
/// - `(id1, id2)` keep the order supplied at creation.
/// - No two records share the same unordered pair.
/// - `user_id` and `created_at` never change after insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMapping {
    /// Storage-internal record identifier.
    pub id: Uuid,
    /// First external identifier, as supplied at creation.
    pub id1: String,
    /// Second external identifier, as supplied at creation.
    pub id2: String,
    /// Token assigned to the pair.
    pub user_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl UserMapping {
    /// Whether this record holds the pair `{a, b}` in either order.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use user_mapping::domain::{UserId, UserMapping};
    /// use uuid::Uuid;
    ///
    /// let mapping = UserMapping {
    ///     id: Uuid::new_v4(),
    ///     id1: "foo".into(),
    ///     id2: "bar".into(),
    ///     user_id: UserId::new("token").expect("non-empty"),
    ///     created_at: Utc::now(),
    /// };
    /// assert!(mapping.matches_pair("bar", "foo"));
    /// assert!(!mapping.matches_pair("foo", "baz"));
    /// ```
    pub fn matches_pair(&self, a: &str, b: &str) -> bool {
        (self.id1 == a && self.id2 == b) || (self.id1 == b && self.id2 == a)
    }
}

/// Insert payload for a mapping that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserMapping {
    /// First external identifier, stored as given.
    pub id1: String,
    /// Second external identifier, stored as given.
    pub id2: String,
    /// Freshly minted token.
    pub user_id: UserId,
}

impl NewUserMapping {
    /// Build an insert payload, preserving the supplied order.
    pub fn new(id1: impl Into<String>, id2: impl Into<String>, user_id: UserId) -> Self {
        Self {
            id1: id1.into(),
            id2: id2.into(),
            user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn user_id_serialises_as_plain_string() {
        let id = UserId::new("abc").expect("non-empty");
        assert_eq!(serde_json::to_value(&id).expect("serialise"), "abc");
        let err = serde_json::from_value::<UserId>(serde_json::json!(""))
            .expect_err("empty token rejected");
        assert!(err.to_string().contains("must not be empty"));
    }

    #[rstest]
    #[case("a", "b", true)]
    #[case("b", "a", true)]
    #[case("a", "a", false)]
    #[case("a", "c", false)]
    fn matches_pair_ignores_order(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
        let mapping = UserMapping {
            id: Uuid::nil(),
            id1: "a".into(),
            id2: "b".into(),
            user_id: UserId::new("token").expect("non-empty"),
            created_at: Utc::now(),
        };
        assert_eq!(mapping.matches_pair(a, b), expected);
    }

    #[rstest]
    fn new_mapping_keeps_supplied_order() {
        let mapping = NewUserMapping::new("idB", "idA", UserId::new("t").expect("non-empty"));
        assert_eq!(mapping.id1, "idB");
        assert_eq!(mapping.id2, "idA");
    }
}
