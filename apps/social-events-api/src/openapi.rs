//! OpenAPI documentation configuration

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Social Events API",
        version = "0.1.0",
        description = "REST API for creating, browsing and joining social events",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    )
)]
struct ServiceDoc;

/// Combined OpenAPI documentation for all APIs.
///
/// Domain paths are already absolute (`/events/...`), so they are merged at
/// the root rather than nested.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        ServiceDoc::openapi().merge_from(domain_events::ApiDoc::openapi())
    }
}
