//! Domain types for the Square Root API.
//!
//! This module contains the number parsing and square-root logic shared by
//! the HTTP handlers and the Slack bot.

mod sqrt;

pub use sqrt::*;
