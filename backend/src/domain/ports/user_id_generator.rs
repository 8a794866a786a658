//! Port for minting fresh user tokens.
use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised when no token can be produced.
    pub enum UserIdGenerationError {
        /// The entropy source or allocator refused to produce a value.
        Exhausted { message: String } => "user id generation failed: {message}",
    }
}

/// Produces globally unique opaque tokens.
#[cfg_attr(test, mockall::automock)]
pub trait UserIdGenerator: Send + Sync {
    /// Mint a token that will not plausibly collide with any other.
    fn generate(&self) -> Result<UserId, UserIdGenerationError>;
}
