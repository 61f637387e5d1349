//! OpenAPI documentation for chronicle-service.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chronicle API",
        version = "1.0.0",
        description = "Blogging platform backend: posts organized into optional groups, comments, and a follow graph feeding a personalized timeline. Serves JSON view models to an external presentation layer; mutating actions answer with redirects.",
        contact(
            name = "Chronicle Team",
            email = "team@chronicle.dev"
        ),
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "feeds", description = "Global, group and follow feeds"),
        (name = "posts", description = "Post detail, creation and editing"),
        (name = "comments", description = "Comments on posts"),
        (name = "profiles", description = "Author pages and the follow graph"),
        (name = "media", description = "Image attachment uploads"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session"))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token from the identity provider"))
                        .build(),
                ),
            );
        }
    }
}
