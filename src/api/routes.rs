//! Route definitions for the API.

use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::{require_api_key, ApiKeyValidator, API_KEY_HEADER};
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root,
        handlers::sqrt,
        handlers::whoami,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::WelcomeResponse,
        crate::api::types::CallerIdentity,
        crate::api::types::HealthResponse,
        crate::domain::SqrtResponse,
        crate::error::ErrorResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "sqrt", description = "Square root calculation"),
        (name = "general", description = "Welcome and identity endpoints"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Square Root API",
        version = "0.1.0",
        description = "A simple API that returns the square root of any number",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
///
/// With a validator, `/sqrt/{number}` and `/whoami` require the `X-API-Key`
/// header. Without one every route is open.
pub fn build_router(state: AppState, api_key_validator: Option<ApiKeyValidator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected_routes = Router::new()
        .route("/sqrt/:number", get(handlers::sqrt))
        .route("/whoami", get(handlers::whoami));

    let protected_routes = match api_key_validator {
        Some(validator) => {
            protected_routes.layer(middleware::from_fn_with_state(validator, require_api_key))
        }
        None => protected_routes,
    };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .with_state(state);

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
