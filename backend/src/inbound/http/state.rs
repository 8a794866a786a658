//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the
//! resolver port, so they can be exercised with a mock.

use std::sync::Arc;

use super::validation::{LengthBoundedPairValidator, PairValidator};
use crate::domain::ports::UserMappingResolver;

/// Dependencies for the user mapping endpoint.
#[derive(Clone)]
pub struct HttpState {
    /// Resolution engine.
    pub resolver: Arc<dyn UserMappingResolver>,
    /// Request validation rule.
    pub validator: Arc<dyn PairValidator>,
}

impl HttpState {
    /// State using the default 50-character validator.
    pub fn new(resolver: Arc<dyn UserMappingResolver>) -> Self {
        Self {
            resolver,
            validator: Arc::new(LengthBoundedPairValidator::default()),
        }
    }

    /// Replace the validation rule.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn PairValidator>) -> Self {
        self.validator = validator;
        self
    }
}
