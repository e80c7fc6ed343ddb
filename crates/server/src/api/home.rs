//! Home page discovery handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use dramas_core::HomePage;
use serde::Deserialize;

use super::error::{ApiError, ApiResponse};
use super::middleware::{enforce_rate_limit, ClientIdentity};
use super::search::parse_int;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HomeParams {
    #[serde(default)]
    pub count: Option<String>,
}

/// GET /api/home?count=
pub async fn home(
    State(state): State<Arc<AppState>>,
    client: ClientIdentity,
    Query(params): Query<HomeParams>,
) -> Result<Json<ApiResponse<HomePage>>, ApiError> {
    enforce_rate_limit(&state, "home", &client).await?;

    let count = parse_int(params.count.as_deref(), "count")?;
    load(&state, count).await
}

/// GET /api/channels
///
/// Same channels as the home page, always at the configured size.
pub async fn channels(
    State(state): State<Arc<AppState>>,
    client: ClientIdentity,
) -> Result<Json<ApiResponse<HomePage>>, ApiError> {
    enforce_rate_limit(&state, "home", &client).await?;
    load(&state, None).await
}

async fn load(state: &AppState, count: Option<i64>) -> Result<Json<ApiResponse<HomePage>>, ApiError> {
    let page = state
        .discovery()
        .load_channels(count)
        .await
        .map_err(|e| ApiError::from_catalog(e, "Failed to load home"))?;
    Ok(ApiResponse::ok(page))
}
