//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ==================== Root ====================

/// Static welcome payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
}

// ==================== Identity ====================

/// Caller identity as forwarded by the hosting platform's proxy.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CallerIdentity {
    /// Value of `X-Forwarded-User`, or `unknown`.
    pub user: String,
    /// Value of `X-Forwarded-Email`, or `unknown`.
    pub email: String,
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Slack bot state: disabled, connecting or running.
    pub slack_bot: String,
    /// Slack reconnects since startup.
    pub slack_reconnects: u64,
    /// Timestamp.
    pub timestamp: String,
}
