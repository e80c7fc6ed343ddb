//! Single show lookup handler.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use dramas_core::{CatalogError, CatalogService, ShowDetail};

use super::error::{ApiError, ApiResponse};
use super::middleware::{enforce_rate_limit, ClientIdentity};
use crate::state::AppState;

/// GET /api/shows/{id}
///
/// The show record plus all of its media assets. A show without assets
/// returns an empty list.
pub async fn get_show(
    State(state): State<Arc<AppState>>,
    client: ClientIdentity,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ShowDetail>>, ApiError> {
    enforce_rate_limit(&state, "show", &client).await?;

    let failed = |e: CatalogError| ApiError::from_catalog(e, "Failed to load show");
    let id = CatalogService::parse_show_id(&id).map_err(failed)?;
    let detail = state.catalog().show_detail(id).await.map_err(failed)?;

    Ok(ApiResponse::ok(detail))
}
