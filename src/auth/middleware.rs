//! Authentication middleware for axum.

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::ApiKeyValidator;
use crate::error::ApiError;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Reject requests that do not carry the configured API key.
///
/// A missing header yields `401`, a wrong key `403`. Neither response
/// echoes the presented or configured key.
pub async fn require_api_key(
    State(validator): State<ApiKeyValidator>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let api_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::MissingApiKey)?;

    if !validator.validate(api_key) {
        tracing::warn!(
            key_len = api_key.len(),
            path = %request.uri().path(),
            "Invalid API key attempted"
        );
        return Err(ApiError::InvalidApiKey);
    }

    Ok(next.run(request).await)
}
