//! Router and shared request state.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use orgsearch_storage::OrganizationStore;
use orgsearch_store_postgres::PostgresStore;
use serde_json::{json, Value};
use tokio::sync::watch;

use crate::auth::{AccessCodeManager, TokenIssuer};
use crate::handlers;

pub const PROCESS_TIME_HEADER: &str = "x-process-time";

#[derive(Clone)]
pub struct AppState {
    pub organizations: Arc<dyn OrganizationStore>,
    pub access_codes: Arc<AccessCodeManager>,
    pub tokens: Arc<TokenIssuer>,
    /// Flipped to false when shutdown starts.
    pub ready: watch::Receiver<bool>,
    /// Database checked by `/readyz`, if any.
    pub probe: Option<PostgresStore>,
    pub metrics: Option<PrometheusHandle>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/search", get(handlers::search::search))
        .route(
            "/organization/{id}",
            get(handlers::organizations::get_organization),
        )
        .route("/stats", get(handlers::stats::get_stats))
        .route("/api/signup", post(handlers::auth::signup))
        .route("/api/verify-code", post(handlers::auth::verify_code))
        .route(
            "/api/request-login-code",
            post(handlers::auth::request_login_code),
        )
        .route("/api/login", post(handlers::auth::verify_code))
        .route("/api/me", get(handlers::auth::me))
        .route("/healthz", get(handlers::health::healthz))
        .route("/readyz", get(handlers::health::readyz))
        .route("/metrics", get(handlers::health::metrics))
        .layer(middleware::from_fn(track_requests))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "orgsearch",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "search": "GET /search",
            "organization": "GET /organization/{id}",
            "stats": "GET /stats",
            "signup": "POST /api/signup",
            "verify_code": "POST /api/verify-code",
            "request_login_code": "POST /api/request-login-code",
            "login": "POST /api/login",
            "me": "GET /api/me",
        }
    }))
}

/// Adds the `X-Process-Time` header (seconds) and records request metrics.
async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let mut response = next.run(request).await;

    let elapsed = start.elapsed();
    if let Ok(value) = HeaderValue::from_str(&format!("{:.6}", elapsed.as_secs_f64())) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }
    crate::metrics::record_http_request(
        method.as_str(),
        &route,
        response.status().as_u16(),
        elapsed,
    );
    tracing::debug!(
        method = %method,
        route = %route,
        status = response.status().as_u16(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Request handled"
    );

    response
}
