//! Catalog read path integration tests.
//!
//! These tests drive the catalog services through the public API with mock
//! stores:
//! - Search paging and caching across services sharing one cache
//! - Expired cache entries being refreshed from the store
//! - Rate limiting keyed per route family

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use dramas_core::{
    catalog::CachedSearch,
    testing::{fixtures, MockCacheStore, MockQueryStore},
    CatalogService, DiscoveryService, RateLimiter, ResultCache, SearchQuery,
};

/// Test helper wiring both services to the same mocks.
struct TestHarness {
    store: Arc<MockQueryStore>,
    cache_store: Arc<MockCacheStore>,
    catalog: CatalogService,
    discovery: DiscoveryService,
}

impl TestHarness {
    async fn new() -> Self {
        let store = Arc::new(MockQueryStore::new());
        let cache_store = Arc::new(MockCacheStore::new());
        let cache = ResultCache::new(cache_store.clone());

        let items: Vec<_> = (1..=3)
            .map(|id| fixtures::catalog_item(id, &format!("Dimension X {}", id)))
            .collect();
        store
            .respond_when("COUNT(*)", vec![fixtures::row(json!({ "c": "3" }))])
            .await;
        store
            .respond_when("FROM radio_shows", items.iter().map(fixtures::catalog_row).collect())
            .await;

        Self {
            catalog: CatalogService::new(store.clone(), cache, 300),
            discovery: DiscoveryService::new(store.clone(), 12),
            store,
            cache_store,
        }
    }
}

#[tokio::test]
async fn test_search_then_cached_search() {
    let h = TestHarness::new().await;
    let query = SearchQuery::new("Dimension X");

    let page = h.catalog.search(&query).await.unwrap();
    assert_eq!(page.total_count, 3);
    assert_eq!(page.shows.len(), 3);
    let after_first = h.store.statement_count().await;

    let again = h.catalog.search(&query).await.unwrap();
    assert_eq!(again, page);
    assert_eq!(h.store.statement_count().await, after_first);

    let raw = h.cache_store.raw(&query.cache_key()).await.unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(stored["expires_at"].is_string());
    let snapshot: CachedSearch = serde_json::from_value(stored["value"].clone()).unwrap();
    assert_eq!(snapshot.total, 3);
}

#[tokio::test]
async fn test_expired_entry_is_refetched() {
    let h = TestHarness::new().await;
    let query = SearchQuery::new("dimension");

    let stale = json!({
        "value": { "total": 99, "items": [], "assets": {} },
        "stored_at": "2020-01-01T00:00:00Z",
        "expires_at": "2020-01-01T00:05:00Z"
    });
    h.cache_store.insert_raw(&query.cache_key(), stale.to_string()).await;

    let page = h.catalog.search(&query).await.unwrap();
    assert_eq!(page.total_count, 3);
    assert!(h.store.statement_count().await >= 2);
}

#[tokio::test]
async fn test_discovery_is_not_cached() {
    let h = TestHarness::new().await;

    h.discovery.load_channels(None).await.unwrap();
    h.discovery.load_channels(None).await.unwrap();

    assert_eq!(h.cache_store.len().await, 0);
    assert_eq!(h.cache_store.get_count().await, 0);
}

#[tokio::test]
async fn test_rate_limit_scopes_are_independent() {
    let limiter = RateLimiter::new(2, Duration::from_secs(60));

    assert!(limiter.allow("search:10.0.0.1").await);
    assert!(limiter.allow("search:10.0.0.1").await);
    assert!(!limiter.allow("search:10.0.0.1").await);

    assert!(limiter.allow("show:10.0.0.1").await);
    assert!(limiter.allow("search:10.0.0.2").await);
    assert_eq!(limiter.tracked_keys().await, 3);
}
