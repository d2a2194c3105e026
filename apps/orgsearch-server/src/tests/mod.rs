//! Server unit and integration tests.
//!
//! Tests are organized into modules by feature area:
//! - `common` - Shared test helpers and utilities
//! - `handlers` - HTTP handlers called directly with extracted arguments
//! - `http` - The full router bound to a local port, driven with reqwest

pub mod common;

mod handlers;
