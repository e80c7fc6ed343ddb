use std::collections::BTreeMap;

use tracing::debug;

use super::sql;
use super::types::{CatalogItem, MediaAsset};
use crate::query_store::{QueryStore, QueryStoreError};

/// Fetch one representative asset per item. No statement is sent for an
/// empty item list.
pub async fn fetch_representatives(
    store: &dyn QueryStore,
    items: &[CatalogItem],
) -> Result<BTreeMap<i64, MediaAsset>, QueryStoreError> {
    let ids: Vec<i64> = items.iter().map(|item| item.id).collect();
    let Some(statement) = sql::representative_assets(&ids) else {
        return Ok(BTreeMap::new());
    };

    let rows = store.execute(&statement).await?;
    let assets: BTreeMap<i64, MediaAsset> = rows
        .decode_rows::<MediaAsset>()
        .into_iter()
        .map(|asset| (asset.radio_show_id, asset))
        .collect();

    debug!(items = ids.len(), assets = assets.len(), "Joined representative assets");
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockQueryStore};
    use serde_json::json;

    #[tokio::test]
    async fn test_no_items_sends_nothing() {
        let store = MockQueryStore::new();
        let assets = fetch_representatives(&store, &[]).await.unwrap();
        assert!(assets.is_empty());
        assert_eq!(store.statement_count().await, 0);
    }

    #[tokio::test]
    async fn test_assets_keyed_by_owner() {
        let store = MockQueryStore::new();
        store
            .respond_when(
                "FROM audio_files",
                vec![
                    fixtures::row(json!({
                        "radio_show_id": 1, "id": 10, "streaming_url": "s1",
                        "download_url": null, "duration": 60
                    })),
                    fixtures::row(json!({
                        "radio_show_id": "2", "id": "20", "streaming_url": null,
                        "download_url": "d2", "duration": "120.5"
                    })),
                ],
            )
            .await;

        let items = vec![fixtures::catalog_item(1, "a"), fixtures::catalog_item(2, "b")];
        let assets = fetch_representatives(&store, &items).await.unwrap();

        assert_eq!(assets.len(), 2);
        assert_eq!(assets[&1].streaming_url.as_deref(), Some("s1"));
        assert_eq!(assets[&2].duration, Some(120.5));

        let statements = store.statements().await;
        assert!(statements[0].contains("IN (1,2)"));
    }
}
