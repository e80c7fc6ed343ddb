//! Catalog search handler.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use dramas_core::{SearchQuery, SearchResultPage};
use serde::Deserialize;

use super::error::{ApiError, ApiResponse};
use super::middleware::{enforce_rate_limit, ClientIdentity};
use crate::state::AppState;

// ============================================================================
// Request types
// ============================================================================

/// Raw query string; numbers are parsed by hand so bad input gets a JSON
/// error instead of the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl SearchParams {
    fn into_query(self) -> Result<SearchQuery, ApiError> {
        Ok(SearchQuery {
            term: self.q.unwrap_or_default(),
            page: parse_int(self.page.as_deref(), "page")?,
            limit: parse_int(self.limit.as_deref(), "limit")?,
        })
    }
}

/// Parse an optional integer parameter. Blank counts as absent.
pub(crate) fn parse_int(raw: Option<&str>, name: &str) -> Result<Option<i64>, ApiError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("Invalid {}: {}", name, v))),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/search?q=&page=&limit=
pub async fn search(
    State(state): State<Arc<AppState>>,
    client: ClientIdentity,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<SearchResultPage>>, ApiError> {
    enforce_rate_limit(&state, "search", &client).await?;

    let query = params.into_query()?;
    let page = state
        .catalog()
        .search(&query)
        .await
        .map_err(|e| ApiError::from_catalog(e, "Search failed"))?;

    Ok(ApiResponse::ok(page))
}
