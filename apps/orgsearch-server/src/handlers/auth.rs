//! Signup, verification, login and identity endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use orgsearch_storage::{UserInfo, MAX_FILTER_LEN};
use serde::{Deserialize, Serialize};

use super::{check_len, ApiError, AuthenticatedUser};
use crate::server::AppState;

const MAX_CODE_LEN: usize = 32;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub access_code: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginCodeRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: TokenResponse,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: UserInfo,
    pub expires_at: i64,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::Validation(e.body_text()))
}

/// Minimal structural check; deliverability is proven by the access code.
fn validate_email(email: &str) -> Result<(), ApiError> {
    check_len("email", email, MAX_FILTER_LEN)?;
    let valid = match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.trim().contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ApiError::Validation("Invalid email address".into()))
    }
}

fn required(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    check_len(field, value, MAX_FILTER_LEN)?;
    Ok(value.to_string())
}

fn validate_code(code: &str) -> Result<(), ApiError> {
    if code.trim().is_empty() {
        return Err(ApiError::Validation("access_code must not be empty".into()));
    }
    check_len("access_code", code, MAX_CODE_LEN)
}

/// `POST /api/signup`
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = json_body(payload)?;
    validate_email(&req.email)?;
    let user = UserInfo {
        email: req.email,
        first_name: required("first_name", &req.first_name)?,
        last_name: required("last_name", &req.last_name)?,
        company: match req.company.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => {
                check_len("company", c, MAX_FILTER_LEN)?;
                Some(c.to_string())
            }
            _ => None,
        },
    };

    state.access_codes.issue(user).await?;
    Ok(Json(MessageResponse {
        message: "Verification code sent to your email",
    }))
}

/// `POST /api/request-login-code`
pub async fn request_login_code(
    State(state): State<AppState>,
    payload: Result<Json<LoginCodeRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let req = json_body(payload)?;
    validate_email(&req.email)?;

    state.access_codes.issue_for_existing_user(&req.email).await?;
    Ok(Json(MessageResponse {
        message: "Login code sent to your email",
    }))
}

/// `POST /api/verify-code` and `POST /api/login`
pub async fn verify_code(
    State(state): State<AppState>,
    payload: Result<Json<VerifyCodeRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let req = json_body(payload)?;
    validate_email(&req.email)?;
    validate_code(&req.access_code)?;

    let user = state
        .access_codes
        .verify(&req.email, &req.access_code)
        .await?;
    let issued = state.tokens.issue(&user)?;

    Ok(Json(LoginResponse {
        message: "Verification successful",
        token: TokenResponse {
            access_token: issued.token,
            token_type: "bearer",
            expires_at: issued.expires_at,
            user,
        },
    }))
}

/// `GET /api/me`
pub async fn me(AuthenticatedUser(claims): AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        user: claims.user_info(),
        expires_at: claims.exp,
    })
}
