//! Result caching in a remote key-value store.
//!
//! The cache is an optimization only: [`ResultCache`] never returns an error
//! to its caller. Failures are logged and reported as
//! [`CacheLookup::Unavailable`] or a `false` write.

mod kv;
mod result_cache;

pub use kv::KvClient;
pub use result_cache::{CacheEnvelope, CacheLookup, ResultCache};

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by cache store implementations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Namespace or credentials missing.
    #[error("KV not configured: {0}")]
    NotConfigured(String),

    /// API returned a non-success response.
    #[error("KV API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Raw string storage with optional expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch the value stored under `key`. `Ok(None)` means not found.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl_secs` when given.
    async fn put(&self, key: &str, value: String, ttl_secs: Option<u64>)
        -> Result<(), CacheError>;
}
