//! Error types for the Square Root API.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Unified error type for API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The path parameter is not a finite number.
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// The number parses but lies outside the domain of the square root.
    #[error("Cannot compute square root of a negative number")]
    NegativeNumber,

    #[error("Missing API key")]
    MissingApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Slack error: {0}")]
    Slack(String),

    /// A remote Square Root API returned an error or an unusable body.
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::InvalidNumber(_) => (StatusCode::BAD_REQUEST, "INVALID_NUMBER"),
            ApiError::NegativeNumber => (StatusCode::BAD_REQUEST, "NEGATIVE_NUMBER"),
            ApiError::MissingApiKey => (StatusCode::UNAUTHORIZED, "MISSING_API_KEY"),
            ApiError::InvalidApiKey => (StatusCode::FORBIDDEN, "INVALID_API_KEY"),
            ApiError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            ApiError::Slack(_) => (StatusCode::BAD_GATEWAY, "SLACK_ERROR"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
        }
    }
}

/// Error response body for API clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            ApiError::Config(msg)
            | ApiError::Slack(msg)
            | ApiError::Upstream(msg) => {
                // Log the actual error but don't expose internals
                tracing::error!(error = %msg, code, "Request failed");
                "An internal error occurred".to_string()
            }
            other => {
                tracing::debug!(error = %other, code, "Request rejected");
                other.to_string()
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
