//! HTTP handler tests.
//!
//! These tests call the handler functions with already-extracted arguments.
//! They are organized by resource.

mod auth;
mod organizations;
mod search;
mod stats;
