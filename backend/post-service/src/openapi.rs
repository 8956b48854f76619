use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
/// OpenAPI documentation for Prism Post Service
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Prism Post Service API",
        version = "1.0.0",
        description = "Media ingestion service for the Prism content-sharing platform. Receives multipart uploads, delegates binary storage to the external media host, derives post records, and reconciles post-to-tag links.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "posts", description = "Post ingestion and retrieval"),
        (name = "search", description = "Title/tag search over public posts"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Opaque session token"))
                        .build(),
                ),
            )
        }
    }
}
