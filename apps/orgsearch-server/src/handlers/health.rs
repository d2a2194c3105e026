//! Liveness, readiness and metrics exposition.

use axum::extract::State;
use axum::http::StatusCode;

use crate::server::AppState;

pub async fn healthz() -> &'static str {
    "ok"
}

/// Ready once listening and until shutdown begins, provided the store answers.
pub async fn readyz(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    let ready = *state.ready.borrow();
    if !ready {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    if let Some(probe) = &state.probe {
        if let Err(e) = probe.ping().await {
            tracing::warn!(error = %e, "Readiness probe failed");
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    }
    Ok("ok")
}

pub async fn metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or(StatusCode::NOT_FOUND)
}
