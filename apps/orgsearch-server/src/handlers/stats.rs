use axum::extract::State;
use axum::Json;
use orgsearch_storage::Stats;

use super::{ApiError, AuthenticatedUser};
use crate::server::AppState;

/// `GET /stats`
pub async fn get_stats(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Stats>, ApiError> {
    let stats = crate::stats::aggregate(state.organizations.as_ref()).await?;
    Ok(Json(stats))
}
