use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use orgsearch_storage::{Organization, SearchCriteria, SearchFilters, DEFAULT_LIMIT};
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub jurisdiction: Option<String>,
    pub legal_form: Option<String>,
    pub status: Option<String>,
    pub participant_name: Option<String>,
    pub participant_birth_year: Option<i32>,
    #[serde(default)]
    pub birth_year_range: u32,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<Organization>,
    pub pagination: Pagination,
}

/// `GET /search`
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::Validation(e.body_text()))?;

    let criteria = SearchCriteria::new(
        SearchFilters {
            name: params.name,
            description: params.description,
            jurisdiction: params.jurisdiction,
            legal_form: params.legal_form,
            status: params.status,
            participant_name: params.participant_name,
            participant_birth_year: params.participant_birth_year,
            birth_year_range: params.birth_year_range,
        },
        params.limit.unwrap_or(DEFAULT_LIMIT),
        params.offset.unwrap_or(0),
    )?;

    let page = state.organizations.search_organizations(&criteria).await?;

    let (limit, offset) = (criteria.limit(), criteria.offset());
    Ok(Json(SearchResponse {
        results: page.organizations,
        pagination: Pagination {
            total: page.total,
            limit,
            offset,
            has_more: offset.saturating_add(limit) < page.total,
        },
    }))
}
