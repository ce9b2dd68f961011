//! OpenAPI documentation.

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::health_handler::HealthResponse;
use crate::handlers::session_handler::{LoginRequest, SessionResponse, WhoAmIResponse};
use crate::handlers::user_handler::RegisterRequest;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::user_handler::register,
        crate::handlers::session_handler::login,
        crate::handlers::session_handler::logout,
        crate::handlers::session_handler::current_session,
        crate::handlers::admin_handler::clear,
        crate::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            SessionResponse,
            WhoAmIResponse,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Account registration"),
        (name = "Sessions", description = "Login, logout and session lookup"),
        (name = "Admin", description = "Store-wide reset"),
        (name = "Health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("authorization"))),
            );
        }
    }
}
