//! Auth handler tests.
//!
//! Signup, code verification, login code requests and `/api/me`, backed by
//! the in-memory credential store.

use super::super::common::*;
use axum::extract::State;
use axum::Json;
use orgsearch_storage::{CredentialStore, MockOrganizationStore, StoreError};

use crate::handlers::auth::{
    me, request_login_code, signup, verify_code, LoginCodeRequest, SignupRequest,
    VerifyCodeRequest,
};
use crate::handlers::ApiError;

fn signup_request(email: &str) -> SignupRequest {
    SignupRequest {
        email: email.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        company: Some("  Analytical Engines ".to_string()),
    }
}

fn verify_request(email: &str, code: &str) -> VerifyCodeRequest {
    VerifyCodeRequest {
        email: email.to_string(),
        access_code: code.to_string(),
    }
}

#[tokio::test]
async fn handler_signup_stores_and_mails_code() {
    let app = create_test_app(MockOrganizationStore::new());

    let response = signup(
        State(app.state.clone()),
        Ok(Json(signup_request("Ada@Example.com"))),
    )
    .await
    .unwrap();
    assert_eq!(response.message, "Verification code sent to your email");

    let codes = app
        .credentials
        .list_access_codes("ada@example.com")
        .await
        .unwrap();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].user_info.company.as_deref(), Some("Analytical Engines"));
    assert_eq!(app.outbox.count(), 1);

    let sent = app.outbox.sent.lock().unwrap();
    assert_eq!(sent[0].to, "ada@example.com");
    assert!(sent[0].text.contains(&codes[0].code));
    assert!(sent[0].html.contains(&codes[0].code));
}

#[tokio::test]
async fn handler_signup_validates_input() {
    let app = create_test_app(MockOrganizationStore::new());

    let bad_email = signup_request("not-an-email");
    let err = signup(State(app.state.clone()), Ok(Json(bad_email)))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let blank_name = SignupRequest {
        first_name: "   ".to_string(),
        ..signup_request("ada@example.com")
    };
    let err = signup(State(app.state.clone()), Ok(Json(blank_name)))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    assert_eq!(app.outbox.count(), 0);
}

#[tokio::test]
async fn handler_signup_without_provider_stores_code_then_fails() {
    let app = create_test_app_with_mailer(MockOrganizationStore::new(), false);

    let err = signup(
        State(app.state.clone()),
        Ok(Json(signup_request("ada@example.com"))),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::DeliveryFailed));
    assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);

    let codes = app
        .credentials
        .list_access_codes("ada@example.com")
        .await
        .unwrap();
    assert_eq!(codes.len(), 1);
}

#[tokio::test]
async fn handler_verify_code_creates_user_and_issues_token() {
    let app = create_test_app(MockOrganizationStore::new());
    signup(
        State(app.state.clone()),
        Ok(Json(signup_request("ada@example.com"))),
    )
    .await
    .unwrap();
    let code = app.latest_code("ada@example.com").await;

    // Codes are accepted case-insensitively with surrounding whitespace
    let submitted = format!(" {} ", code.to_lowercase());
    let response = verify_code(
        State(app.state.clone()),
        Ok(Json(verify_request("ADA@example.com", &submitted))),
    )
    .await
    .unwrap();

    assert_eq!(response.message, "Verification successful");
    assert_eq!(response.token.token_type, "bearer");
    assert_eq!(response.token.user.email, "ada@example.com");

    let claims = app
        .state
        .tokens
        .validate(&response.token.access_token)
        .unwrap();
    assert_eq!(claims.email, "ada@example.com");
    assert_eq!(claims.company.as_deref(), Some("Analytical Engines"));

    let user = app
        .credentials
        .get_user_by_email("ada@example.com")
        .await
        .unwrap();
    assert_eq!(user.first_name, "Ada");

    // Single use
    let err = verify_code(
        State(app.state.clone()),
        Ok(Json(verify_request("ada@example.com", &code))),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredential));
}

#[tokio::test]
async fn handler_verify_code_wrong_code_is_rejected() {
    let app = create_test_app(MockOrganizationStore::new());
    signup(
        State(app.state.clone()),
        Ok(Json(signup_request("ada@example.com"))),
    )
    .await
    .unwrap();
    let code = app.latest_code("ada@example.com").await;
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let err = verify_code(
        State(app.state.clone()),
        Ok(Json(verify_request("ada@example.com", wrong))),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredential));
    assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);

    // A wrong guess does not burn the real code
    verify_code(
        State(app.state.clone()),
        Ok(Json(verify_request("ada@example.com", &code))),
    )
    .await
    .unwrap();

    assert!(matches!(
        app.credentials.get_user_by_email("ada@example.com").await,
        Ok(_)
    ));
}

#[tokio::test]
async fn handler_verify_code_unknown_email_is_rejected() {
    let app = create_test_app(MockOrganizationStore::new());

    let err = verify_code(
        State(app.state.clone()),
        Ok(Json(verify_request("ghost@example.com", "ABC123"))),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredential));
    assert!(matches!(
        app.credentials.get_user_by_email("ghost@example.com").await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
async fn handler_verify_code_validates_code_shape() {
    let app = create_test_app(MockOrganizationStore::new());

    for code in ["   ".to_string(), "A".repeat(33)] {
        let err = verify_code(
            State(app.state.clone()),
            Ok(Json(verify_request("ada@example.com", &code))),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}

#[tokio::test]
async fn handler_request_login_code_unknown_user_is_404() {
    let app = create_test_app(MockOrganizationStore::new());

    let err = request_login_code(
        State(app.state.clone()),
        Ok(Json(LoginCodeRequest {
            email: "ghost@example.com".to_string(),
        })),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::NotFound("User")));
    assert_eq!(app.outbox.count(), 0);
}

#[tokio::test]
async fn handler_login_code_flow_for_existing_user() {
    let app = create_test_app(MockOrganizationStore::new());
    signup(
        State(app.state.clone()),
        Ok(Json(signup_request("ada@example.com"))),
    )
    .await
    .unwrap();
    let code = app.latest_code("ada@example.com").await;
    verify_code(
        State(app.state.clone()),
        Ok(Json(verify_request("ada@example.com", &code))),
    )
    .await
    .unwrap();

    let response = request_login_code(
        State(app.state.clone()),
        Ok(Json(LoginCodeRequest {
            email: " ADA@example.com".to_string(),
        })),
    )
    .await
    .unwrap();
    assert_eq!(response.message, "Login code sent to your email");
    assert_eq!(app.outbox.count(), 2);

    // The login code carries the stored profile
    let login_code = app.latest_code("ada@example.com").await;
    let response = verify_code(
        State(app.state.clone()),
        Ok(Json(verify_request("ada@example.com", &login_code))),
    )
    .await
    .unwrap();
    assert_eq!(response.token.user.last_name, "Lovelace");
}

#[tokio::test]
async fn handler_me_echoes_token_claims() {
    let app = create_test_app(MockOrganizationStore::new());
    let user = test_user("ada@example.com");

    let response = me(app.authenticated(&user)).await;

    assert_eq!(response.user, user);
    assert!(response.expires_at > chrono::Utc::now().timestamp());
}
