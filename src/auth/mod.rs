//! Authentication module for the Square Root API.
//!
//! A single shared secret, presented in the `X-API-Key` header, gates the
//! calculation endpoints.

mod api_key;
mod middleware;

pub use api_key::*;
pub use middleware::*;
