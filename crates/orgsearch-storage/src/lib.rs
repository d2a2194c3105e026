//! Storage abstraction for orgsearch.
//!
//! Backend crates (`orgsearch-store-postgres`, `orgsearch-store-memory`) implement the
//! traits in [`store`] so the server never depends on a specific database engine or
//! schema details.

mod store;
mod types;

pub use store::*;
pub use types::*;

use subtle::ConstantTimeEq;
use thiserror::Error;

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("backend error: {0}")]
    Backend(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Compare a submitted access code with the stored one in constant time.
///
/// Length differences are not hidden; codes are fixed-width so the length
/// carries no information.
pub fn codes_match(submitted: &str, stored: &str) -> bool {
    submitted.as_bytes().ct_eq(stored.as_bytes()).into()
}

/// Normalize an email address for lookups (trimmed, lowercased).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
