//! JSON envelope and error mapping for the public API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dramas_core::CatalogError;
use serde::Serialize;
use tracing::error;

/// Envelope wrapping every catalog response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

/// An error already reduced to what the client may see.
///
/// Underlying causes are logged when the error is built and never returned.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn rate_limited() -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded")
    }

    /// Map a catalog failure. `failure` is the generic message used when the
    /// store itself failed, e.g. "Search failed".
    pub fn from_catalog(err: CatalogError, failure: &str) -> Self {
        match err {
            CatalogError::Validation(message) => Self::bad_request(message),
            CatalogError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Not found"),
            err if err.is_configuration() => {
                error!(error = %err, "Catalog store is not configured");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Service not configured")
            }
            err => {
                error!(error = %err, "{}", failure);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}
