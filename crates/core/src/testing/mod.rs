//! Testing utilities and mock implementations.
//!
//! Mocks for the remote query store and the key-value cache, so the catalog
//! services and the HTTP layer can be exercised without Cloudflare.
//!
//! # Example
//!
//! ```rust,ignore
//! use dramas_core::testing::{fixtures, MockCacheStore, MockQueryStore};
//!
//! let store = Arc::new(MockQueryStore::new());
//! store.respond_when("COUNT(*)", vec![fixtures::row(json!({ "c": 1 }))]).await;
//!
//! let cache = ResultCache::new(Arc::new(MockCacheStore::new()));
//! let catalog = CatalogService::new(store.clone(), cache, 300);
//! ```

mod mock_cache_store;
mod mock_query_store;

pub use mock_cache_store::MockCacheStore;
pub use mock_query_store::MockQueryStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::Value;

    use crate::catalog::{CatalogItem, MediaAsset};
    use crate::query_store::Row;

    /// Turn a JSON object literal into a row. Non-objects give an empty row.
    pub fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => Row::new(),
        }
    }

    /// Create a catalog item with reasonable defaults.
    pub fn catalog_item(id: i64, title: &str) -> CatalogItem {
        CatalogItem {
            id,
            identifier: Some(format!("OTRR_{}", title.replace(' ', "_"))),
            title: Some(title.to_string()),
            description: Some(format!("An episode titled {}.", title)),
            year: Some("1950".to_string()),
            downloads: 100 * id,
        }
    }

    /// Create a representative asset owned by `show_id`.
    pub fn media_asset(show_id: i64, streaming_url: Option<&str>, duration: Option<f64>) -> MediaAsset {
        MediaAsset {
            id: show_id * 10,
            radio_show_id: show_id,
            streaming_url: streaming_url.map(str::to_string),
            download_url: None,
            duration,
        }
    }

    /// Row form of a catalog item, as the store would return it.
    pub fn catalog_row(item: &CatalogItem) -> Row {
        match serde_json::to_value(item) {
            Ok(value) => row(value),
            Err(_) => Row::new(),
        }
    }
}
