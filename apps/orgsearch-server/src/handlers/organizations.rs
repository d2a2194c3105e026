use axum::extract::{Path, State};
use axum::Json;
use orgsearch_storage::{Organization, OrganizationId, StoreError, MAX_FILTER_LEN};

use super::{check_len, ApiError, AuthenticatedUser};
use crate::server::AppState;

/// `GET /organization/{id}`
pub async fn get_organization(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Organization>, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::Validation("Organization id must not be empty".into()));
    }
    check_len("id", id, MAX_FILTER_LEN)?;

    match state
        .organizations
        .get_organization(&OrganizationId(id.to_string()))
        .await
    {
        Ok(org) => Ok(Json(org)),
        Err(StoreError::NotFound) => Err(ApiError::NotFound("Organization")),
        Err(e) => Err(e.into()),
    }
}
