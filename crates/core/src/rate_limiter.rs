//! Fixed-window request limiter keyed by client identity.
//!
//! Each key gets a counter and a reset instant. The first call after the
//! reset instant starts a new window; there is no background refill.

use std::collections::HashMap;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::debug;

use crate::config::{RateLimitConfig, MAX_DURATION_SECS};
use crate::metrics::RATE_LIMIT_REJECTIONS;

/// Counter state for a single key.
#[derive(Debug, Clone, Copy)]
struct WindowBucket {
    count: u32,
    reset_at: Instant,
}

/// Snapshot of a key's current window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub max_requests: u32,
    pub remaining: u32,
    pub resets_in_ms: u64,
}

/// Fixed-window rate limiter.
///
/// Thread-safe and async-compatible. State lives only in memory and is lost
/// on restart.
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    buckets: Mutex<HashMap<String, WindowBucket>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` calls per `window` per key.
    ///
    /// The window is capped at one year.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            window: window.min(Duration::from_secs(MAX_DURATION_SECS)),
            max_requests,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Record a call for `key` and report whether it is permitted.
    pub async fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now()).await
    }

    /// Same as [`allow`](Self::allow) with an explicit clock reading.
    pub async fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut buckets = self.buckets.lock().await;
        let fresh = WindowBucket {
            count: 0,
            reset_at: now + self.window,
        };

        let bucket = buckets.entry(key.to_string()).or_insert(fresh);
        if bucket.reset_at <= now {
            *bucket = fresh;
        }

        if bucket.count >= self.max_requests {
            debug!(key, "Rate limit exceeded");
            RATE_LIMIT_REJECTIONS.inc();
            return false;
        }

        bucket.count += 1;
        true
    }

    /// Current window for `key`, if one is open.
    pub async fn status(&self, key: &str) -> Option<RateLimitStatus> {
        let now = Instant::now();
        let buckets = self.buckets.lock().await;
        buckets
            .get(key)
            .filter(|b| b.reset_at > now)
            .map(|b| RateLimitStatus {
                max_requests: self.max_requests,
                remaining: self.max_requests.saturating_sub(b.count),
                resets_in_ms: (b.reset_at - now).as_millis() as u64,
            })
    }

    /// Drop buckets whose window has ended. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now()).await
    }

    pub async fn purge_expired_at(&self, now: Instant) -> usize {
        let mut buckets = self.buckets.lock().await;
        let before = buckets.len();
        buckets.retain(|_, b| b.reset_at > now);
        before - buckets.len()
    }

    /// Number of keys currently tracked.
    pub async fn tracked_keys(&self) -> usize {
        self.buckets.lock().await.len()
    }
}
