//! HTTP handlers, grouped by resource.
//!
//! Every handler returns `Result<_, ApiError>`; [`ApiError`] decides the status
//! code and the client-facing message. Store failures are logged here in full
//! and reach clients only as a generic message.

pub mod auth;
pub mod health;
pub mod organizations;
pub mod search;
pub mod stats;

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orgsearch_storage::{CriteriaError, StoreError};
use serde_json::json;

use crate::auth::{AuthError, Claims, TokenError};
use crate::server::AppState;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input.
    Validation(String),
    /// Access code missing, expired or wrong.
    InvalidCredential,
    /// No usable bearer token.
    Unauthorized(&'static str),
    TokenExpired,
    NotFound(&'static str),
    /// Code stored but the email could not be sent.
    DeliveryFailed,
    Internal,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::InvalidCredential => (
                StatusCode::UNAUTHORIZED,
                "invalid_credential",
                "Invalid or expired access code".to_string(),
            ),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.to_string())
            }
            ApiError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "token_expired",
                "Token has expired".to_string(),
            ),
            ApiError::NotFound(what) => {
                (StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
            }
            ApiError::DeliveryFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "delivery_failed",
                "The access code could not be sent and may not arrive. Please request a new one."
                    .to_string(),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error".to_string(),
            ),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.parts().0
    }

    pub fn code(&self) -> &'static str {
        self.parts().1
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, detail) = self.parts();
        let body = Json(json!({ "detail": detail, "code": code }));
        if status == StatusCode::UNAUTHORIZED {
            (status, [(WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ApiError::NotFound("Resource"),
            other => {
                tracing::error!(error = %other, "Store operation failed");
                ApiError::Internal
            }
        }
    }
}

impl From<CriteriaError> for ApiError {
    fn from(e: CriteriaError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Expired => ApiError::TokenExpired,
            TokenError::Invalid(_) => ApiError::Unauthorized("Invalid token"),
            TokenError::Signing(reason) => {
                tracing::error!(error = %reason, "Token signing failed");
                ApiError::Internal
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredential => ApiError::InvalidCredential,
            AuthError::UnknownUser => ApiError::NotFound("User"),
            AuthError::Delivery(_) => ApiError::DeliveryFailed,
            AuthError::Store(e) => e.into(),
        }
    }
}

/// Claims of a validated bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(ApiError::Unauthorized("Missing bearer token"))?
            .to_str()
            .map_err(|_| ApiError::Unauthorized("Malformed authorization header"))?;

        let token = bearer_token(header).ok_or(ApiError::Unauthorized("Missing bearer token"))?;
        let claims = state.tokens.validate(token)?;
        Ok(AuthenticatedUser(claims))
    }
}

/// Token from an `Authorization: Bearer <token>` value (scheme is case-insensitive).
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Reject strings over `max` characters.
pub(crate) fn check_len(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.chars().count() > max {
        Err(ApiError::Validation(format!(
            "{field} must be at most {max} characters"
        )))
    } else {
        Ok(())
    }
}
