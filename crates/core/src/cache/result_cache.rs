use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::CacheStore;
use crate::metrics::CACHE_LOOKUPS;

/// Stored form of a cached value.
///
/// The expiry travels with the value so a stale entry is never served even
/// if the remote store keeps it past its TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEnvelope<T> {
    pub value: T,
    pub stored_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl<T> CacheEnvelope<T> {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    /// A live entry was found.
    Hit(T),
    /// No usable entry: absent, expired or undecodable.
    Miss,
    /// The cache could not be consulted (disabled or failing).
    Unavailable,
}

impl<T> CacheLookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Hit(_) => "hit",
            Self::Miss => "miss",
            Self::Unavailable => "unavailable",
        }
    }
}

/// Typed JSON access to an optional [`CacheStore`]. Never fails.
#[derive(Clone)]
pub struct ResultCache {
    store: Option<Arc<dyn CacheStore>>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A cache that stores nothing and always reports `Unavailable`.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Read and decode the value stored under `key`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> CacheLookup<T> {
        self.get_json_at(key, Utc::now()).await
    }

    pub async fn get_json_at<T: DeserializeOwned>(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> CacheLookup<T> {
        let lookup = self.lookup(key, now).await;
        CACHE_LOOKUPS.with_label_values(&[lookup.label()]).inc();
        lookup
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> CacheLookup<T> {
        let Some(store) = &self.store else {
            return CacheLookup::Unavailable;
        };

        let raw = match store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheLookup::Miss,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed");
                return CacheLookup::Unavailable;
            }
        };

        match serde_json::from_str::<CacheEnvelope<T>>(&raw) {
            Ok(envelope) if envelope.is_expired(now) => {
                debug!(key, "Cache entry expired");
                CacheLookup::Miss
            }
            Ok(envelope) => CacheLookup::Hit(envelope.value),
            Err(e) => {
                warn!(key, error = %e, "Discarding undecodable cache entry");
                CacheLookup::Miss
            }
        }
    }

    /// Encode and store `value` under `key`. Returns whether it was written.
    ///
    /// A `ttl_secs` of `None` or `0` requests no expiry. A TTL too large to
    /// represent as a timestamp is still forwarded to the store but gets no
    /// local expiry.
    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T, ttl_secs: Option<u64>) -> bool {
        let Some(store) = &self.store else {
            return false;
        };

        let ttl_secs = ttl_secs.filter(|t| *t > 0);
        let stored_at = Utc::now();
        let envelope = CacheEnvelope {
            value,
            stored_at,
            expires_at: ttl_secs.and_then(|t| expiry_after(stored_at, t)),
        };

        let raw = match serde_json::to_string(&envelope) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode cache entry");
                return false;
            }
        };

        match store.put(key, raw, ttl_secs).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Cache write failed");
                false
            }
        }
    }
}

fn expiry_after(stored_at: DateTime<Utc>, ttl_secs: u64) -> Option<DateTime<Utc>> {
    let ttl = ChronoDuration::try_seconds(i64::try_from(ttl_secs).ok()?)?;
    stored_at.checked_add_signed(ttl)
}
