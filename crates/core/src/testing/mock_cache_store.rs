//! Mock key-value cache store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cache::{CacheError, CacheStore};

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    ttl_secs: Option<u64>,
}

/// In-memory implementation of the CacheStore trait.
///
/// Values never expire on their own; the TTL passed to `put` is recorded so
/// tests can assert on it. `set_failing(true)` makes every call fail the way
/// an unreachable remote store would.
#[derive(Debug, Default)]
pub struct MockCacheStore {
    values: Arc<RwLock<HashMap<String, StoredValue>>>,
    failing: Arc<RwLock<bool>>,
    gets: Arc<RwLock<u32>>,
}

impl MockCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Test Helpers
    // =========================================================================

    /// Store a raw value as if another writer had put it.
    pub async fn insert_raw(&self, key: &str, value: String) {
        self.values.write().await.insert(
            key.to_string(),
            StoredValue {
                value,
                ttl_secs: None,
            },
        );
    }

    /// TTL recorded for `key`: `None` when absent, `Some(None)` when stored
    /// without expiry.
    pub async fn ttl_of(&self, key: &str) -> Option<Option<u64>> {
        self.values.read().await.get(key).map(|v| v.ttl_secs)
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).map(|v| v.value.clone())
    }

    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn get_count(&self) -> u32 {
        *self.gets.read().await
    }

    async fn check_failing(&self) -> Result<(), CacheError> {
        if *self.failing.read().await {
            return Err(CacheError::ApiError {
                status: 503,
                message: "mock cache unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for MockCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        *self.gets.write().await += 1;
        self.check_failing().await?;
        Ok(self.values.read().await.get(key).map(|v| v.value.clone()))
    }

    async fn put(&self, key: &str, value: String, ttl_secs: Option<u64>) -> Result<(), CacheError> {
        self.check_failing().await?;
        self.values
            .write()
            .await
            .insert(key.to_string(), StoredValue { value, ttl_secs });
        Ok(())
    }
}
