//! HTTP inbound adapter exposing the REST endpoints.

use actix_web::{Scope, web};

pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod user_mappings;
pub mod validation;

pub use error::ApiResult;

/// The `/api` scope with its JSON extractor configuration.
///
/// Callers must register [`state::HttpState`] as app data.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(user_mappings::json_config())
        .service(user_mappings::resolve_user_mapping)
}
