//! Remote query store access.
//!
//! Statements are plain SQL strings sent to a hosted tabular store (Cloudflare
//! D1). Responses are normalized into [`RowSet`]s of column-keyed rows.

mod d1;
pub(crate) mod lenient;
mod types;

pub use d1::D1Client;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when querying the remote store.
#[derive(Debug, Error)]
pub enum QueryStoreError {
    /// The store cannot be addressed with the current configuration.
    #[error("Query store not configured: {0}")]
    NotConfigured(String),

    /// Required secrets are absent. Raised before any network call.
    #[error("Cloudflare credentials missing: {0}")]
    MissingCredentials(String),

    /// Name-based database lookup found no match.
    #[error("D1 database named {name} not found in account {account_id}")]
    DatabaseNotFound { name: String, account_id: String },

    /// API returned a non-success response.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl QueryStoreError {
    /// Whether the failure comes from missing or unresolvable configuration
    /// rather than from the store itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::NotConfigured(_) | Self::MissingCredentials(_) | Self::DatabaseNotFound { .. }
        )
    }
}

/// Executes read statements against the catalog store.
///
/// Implementations perform no statement caching and no retries; each call is
/// an independent request.
#[async_trait]
pub trait QueryStore: Send + Sync {
    /// Execute a single statement and return its result groups.
    async fn execute(&self, statement: &str) -> Result<RowSet, QueryStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors() {
        assert!(QueryStoreError::MissingCredentials("token".into()).is_configuration());
        assert!(QueryStoreError::NotConfigured("db".into()).is_configuration());
        assert!(QueryStoreError::DatabaseNotFound {
            name: "x".into(),
            account_id: "y".into()
        }
        .is_configuration());
        assert!(!QueryStoreError::ApiError {
            status: 500,
            message: "boom".into()
        }
        .is_configuration());
        assert!(!QueryStoreError::ParseError("bad".into()).is_configuration());
    }

    #[test]
    fn test_api_error_display() {
        let err = QueryStoreError::ApiError {
            status: 403,
            message: "forbidden".into(),
        };
        assert_eq!(err.to_string(), "API error: 403 - forbidden");
    }
}
