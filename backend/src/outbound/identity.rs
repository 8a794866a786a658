//! UUID-based `UserIdGenerator`.

use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::ports::{UserIdGenerationError, UserIdGenerator};

/// Mints hyphenated UUID v4 tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidUserIdGenerator;

impl UserIdGenerator for UuidUserIdGenerator {
    fn generate(&self) -> Result<UserId, UserIdGenerationError> {
        UserId::new(Uuid::new_v4().hyphenated().to_string())
            .map_err(|err| UserIdGenerationError::exhausted(err.to_string()))
    }
}
