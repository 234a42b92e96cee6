//! HTTP request handlers.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::HeaderMap,
    Json,
};

use crate::api::types::*;
use crate::domain::{sqrt_of, SqrtResponse};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Square Root API! Use /sqrt/{number} to get a square root.";

const FORWARDED_USER: &str = "X-Forwarded-User";
const FORWARDED_EMAIL: &str = "X-Forwarded-Email";

/// Welcome message.
///
/// GET /
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome message", body = WelcomeResponse)
    ),
    tag = "general"
)]
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// Compute the square root of a number.
///
/// GET /sqrt/{number}
#[utoipa::path(
    get,
    path = "/sqrt/{number}",
    params(
        ("number" = String, Path, description = "Non-negative number")
    ),
    responses(
        (status = 200, description = "Square root computed", body = SqrtResponse),
        (status = 400, description = "Not a number, or negative", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing API key", body = crate::error::ErrorResponse),
        (status = 403, description = "Invalid API key", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = [])),
    tag = "sqrt"
)]
pub async fn sqrt(
    number: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<SqrtResponse>> {
    // Undecodable segments (e.g. invalid UTF-8) are malformed numbers too.
    let Path(number) = number.map_err(|e| ApiError::InvalidNumber(e.body_text()))?;
    let result = sqrt_of(&number)?;

    tracing::debug!(number = result.number, sqrt = result.sqrt, "Square root computed");

    Ok(Json(result))
}

/// Identity of the caller as reported by the platform proxy.
///
/// GET /whoami
#[utoipa::path(
    get,
    path = "/whoami",
    responses(
        (status = 200, description = "Caller identity", body = CallerIdentity),
        (status = 401, description = "Missing API key", body = crate::error::ErrorResponse),
        (status = 403, description = "Invalid API key", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = [])),
    tag = "general"
)]
pub async fn whoami(headers: HeaderMap) -> Json<CallerIdentity> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string()
    };

    Json(CallerIdentity {
        user: header(FORWARDED_USER),
        email: header(FORWARDED_EMAIL),
    })
}

/// Health check endpoint.
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        slack_bot: state.bot_status.state().to_string(),
        slack_reconnects: state
            .bot_status
            .reconnects
            .load(std::sync::atomic::Ordering::Relaxed),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
