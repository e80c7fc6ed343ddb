//! Core metrics for the catalog read path.
//!
//! These are registered into the server's registry; see `all_metrics`.

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service request duration.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "dramas_external_service_duration_seconds",
            "Duration of external service calls",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service", "operation"],
    )
    .unwrap()
});

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "dramas_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Result cache lookups by outcome.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("dramas_cache_lookups_total", "Result cache lookups"),
        &["result"], // result: "hit", "miss", "unavailable"
    )
    .unwrap()
});

/// Requests denied by the rate limiter.
pub static RATE_LIMIT_REJECTIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "dramas_rate_limit_rejections_total",
        "Requests rejected by the rate limiter",
    )
    .unwrap()
});

/// Total matches reported per search.
pub static SEARCH_RESULTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "dramas_search_results",
            "Number of catalog matches per search query",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 500.0, 1000.0]),
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Record the outcome of one remote call.
pub fn record_external_call(service: &str, operation: &str, elapsed_secs: f64, ok: bool) {
    EXTERNAL_SERVICE_DURATION
        .with_label_values(&[service, operation])
        .observe(elapsed_secs);
    EXTERNAL_SERVICE_REQUESTS
        .with_label_values(&[service, operation, if ok { "success" } else { "error" }])
        .inc();
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(RATE_LIMIT_REJECTIONS.clone()),
        Box::new(SEARCH_RESULTS.clone()),
    ]
}
