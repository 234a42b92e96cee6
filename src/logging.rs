//! Logging and tracing setup for the Square Root API.
//!
//! One JSON line per event on stdout. Request spans come from
//! `tower_http`; the Slack connection loop logs under `sqrt_api::slack`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber with JSON formatting.
///
/// `RUST_LOG` overrides the default `sqrt_api=info,tower_http=info`. To see
/// ignored Socket Mode envelopes and per-request rejections:
///
/// ```text
/// RUST_LOG=sqrt_api=info,sqrt_api::slack=debug,sqrt_api::error=debug
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sqrt_api=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}
