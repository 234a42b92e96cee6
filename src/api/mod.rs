//! HTTP API layer for the Square Root API.
//!
//! Provides the welcome, square-root, identity and health endpoints.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
