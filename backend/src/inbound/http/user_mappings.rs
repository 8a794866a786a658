//! User mapping API handler.
//!
//! ```text
//! POST /api/user-mapping  Resolve the stable token for a pair of identifiers
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::{Error, ResolveError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::validation_error;

/// Message returned when the body cannot be parsed into a request.
pub const MALFORMED_BODY_MESSAGE: &str = "request body must be a JSON object";

/// Request body. Fields stay untyped so validation can report wrong types
/// per field instead of rejecting the whole payload.
///
/// Decoded through a JSON map so only objects are accepted.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(from = "Map<String, Value>")]
pub struct UserMappingRequest {
    /// First external identifier.
    #[schema(value_type = String, example = "foo")]
    pub id1: Option<Value>,
    /// Second external identifier.
    #[schema(value_type = String, example = "bar")]
    pub id2: Option<Value>,
}

impl From<Map<String, Value>> for UserMappingRequest {
    fn from(mut body: Map<String, Value>) -> Self {
        Self {
            id1: body.remove("id1"),
            id2: body.remove("id2"),
        }
    }
}

/// Response body carrying the resolved token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UserMappingResponse {
    /// Stable token for the unordered pair.
    #[serde(rename = "userID")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
}

/// JSON extractor settings turning parse failures into `400` domain errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "rejected malformed user mapping request");
        Error::invalid_request(MALFORMED_BODY_MESSAGE).into()
    })
}

/// Resolve the stable token for `{id1, id2}`, creating it on first use.
///
/// The same token is returned whichever order the identifiers arrive in.
#[utoipa::path(
    post,
    path = "/api/user-mapping",
    request_body = UserMappingRequest,
    responses(
        (status = 201, description = "Token for the pair", body = UserMappingResponse),
        (status = 400, description = "Validation failed", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 503, description = "Mapping store unavailable", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["user-mapping"],
    operation_id = "resolveUserMapping"
)]
#[post("/user-mapping")]
pub async fn resolve_user_mapping(
    state: web::Data<HttpState>,
    payload: web::Json<UserMappingRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let pair = state
        .validator
        .validate(request.id1.as_ref(), request.id2.as_ref())
        .map_err(|violations| validation_error(&violations))?;

    let user_id = state
        .resolver
        .resolve(&pair.id1, &pair.id2)
        .await
        .map_err(|err| {
            if !matches!(err, ResolveError::InvalidArgument { .. }) {
                error!(error = %err, "user mapping resolution failed");
            }
            Error::from(err)
        })?;

    Ok(HttpResponse::Created().json(UserMappingResponse {
        user_id: user_id.into(),
    }))
}
