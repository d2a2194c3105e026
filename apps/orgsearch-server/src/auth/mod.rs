//! Email-code authentication and bearer tokens.

mod access_codes;
mod token;

pub use access_codes::AccessCodeManager;
pub use token::{Claims, IssuedToken, TokenError, TokenIssuer};

use crate::email::EmailError;
use orgsearch_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing, expired or mismatched code. Deliberately undifferentiated.
    #[error("Invalid or expired access code")]
    InvalidCredential,

    #[error("No user registered with this email")]
    UnknownUser,

    /// The code was stored but the email could not be sent.
    #[error("Access code could not be delivered: {0}")]
    Delivery(#[source] EmailError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
