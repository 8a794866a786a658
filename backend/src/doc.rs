//! OpenAPI document for the REST API.
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::user_mappings::{UserMappingRequest, UserMappingResponse};

/// OpenAPI document for the user mapping service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User mapping API",
        description = "Stable opaque tokens for unordered pairs of external identifiers."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::user_mappings::resolve_user_mapping,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserMappingRequest,
        UserMappingResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "user-mapping", description = "Pair to token resolution"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
