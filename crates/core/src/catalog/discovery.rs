//! Home page channels: the most downloaded shows and a random selection.

use std::sync::Arc;

use tracing::{debug, instrument};

use super::assets::fetch_representatives;
use super::mapping::map_shows;
use super::sql;
use super::types::{CatalogError, CatalogItem, Channel, HomePage, ShowSummary, MAX_LIMIT};
use crate::query_store::QueryStore;

/// Number of shows per channel when none is requested.
pub const DEFAULT_CHANNEL_SIZE: i64 = 12;

pub struct DiscoveryService {
    store: Arc<dyn QueryStore>,
    default_count: i64,
}

impl DiscoveryService {
    pub fn new(store: Arc<dyn QueryStore>, default_count: u32) -> Self {
        Self {
            store,
            default_count: clamp_count(Some(default_count as i64), DEFAULT_CHANNEL_SIZE),
        }
    }

    pub fn default_count(&self) -> i64 {
        self.default_count
    }

    /// Most downloaded shows first. `count` is clamped to 1..=50.
    pub async fn load_top(&self, count: i64) -> Result<Vec<ShowSummary>, CatalogError> {
        let count = clamp_count(Some(count), self.default_count);
        self.load_slice(&sql::top_shows(count)).await
    }

    /// A random selection; differs between calls. `count` is clamped to 1..=50.
    pub async fn load_random(&self, count: i64) -> Result<Vec<ShowSummary>, CatalogError> {
        let count = clamp_count(Some(count), self.default_count);
        self.load_slice(&sql::random_shows(count)).await
    }

    async fn load_slice(&self, statement: &str) -> Result<Vec<ShowSummary>, CatalogError> {
        let items: Vec<CatalogItem> = self.store.execute(statement).await?.decode_rows();
        let assets = fetch_representatives(self.store.as_ref(), &items).await?;
        Ok(map_shows(&items, &assets))
    }

    /// Both home channels. The two slices are loaded concurrently and
    /// either failure fails the whole page.
    #[instrument(skip(self))]
    pub async fn load_channels(&self, count: Option<i64>) -> Result<HomePage, CatalogError> {
        let count = clamp_count(count, self.default_count);
        let (top, random) = futures::try_join!(self.load_top(count), self.load_random(count))?;
        debug!(count, top = top.len(), random = random.len(), "Loaded home channels");

        Ok(HomePage {
            channels: vec![
                system_channel(
                    "top-downloads",
                    "Top Downloads",
                    "Most popular radio shows",
                    "Popular",
                    top,
                ),
                system_channel(
                    "discover",
                    "Discover",
                    "Random picks from the archive",
                    "Discovery",
                    random,
                ),
            ],
        })
    }
}

fn clamp_count(count: Option<i64>, default: i64) -> i64 {
    count.unwrap_or(default).clamp(1, MAX_LIMIT)
}

fn system_channel(
    id: &str,
    name: &str,
    description: &str,
    category: &str,
    shows: Vec<ShowSummary>,
) -> Channel {
    Channel {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        featured: true,
        category: category.to_string(),
        curated_by: "system".to_string(),
        shows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_store::QueryStoreError;
    use crate::testing::{fixtures, MockQueryStore};
    use serde_json::json;

    async fn seeded_store() -> Arc<MockQueryStore> {
        let store = Arc::new(MockQueryStore::new());
        store
            .respond_when(
                "ORDER BY downloads DESC",
                vec![
                    fixtures::row(json!({ "id": 1, "title": "Popular", "downloads": 900 })),
                    fixtures::row(json!({ "id": 2, "title": "Less", "downloads": 10 })),
                ],
            )
            .await;
        store
            .respond_when(
                "ORDER BY RANDOM()",
                vec![fixtures::row(json!({ "id": 3, "title": "Lucky" }))],
            )
            .await;
        store
            .respond_when(
                "FROM audio_files",
                vec![fixtures::row(json!({
                    "radio_show_id": 1, "id": 11, "streaming_url": "s1", "duration": 600
                }))],
            )
            .await;
        store
    }

    #[tokio::test]
    async fn test_channels_shape() {
        let store = seeded_store().await;
        let svc = DiscoveryService::new(store.clone(), 12);

        let home = svc.load_channels(None).await.unwrap();
        assert_eq!(home.channels.len(), 2);

        let top = &home.channels[0];
        assert_eq!(top.id, "top-downloads");
        assert_eq!(top.name, "Top Downloads");
        assert_eq!(top.category, "Popular");
        assert!(top.featured);
        assert_eq!(top.curated_by, "system");
        assert_eq!(top.shows[0].id, "1");
        assert_eq!(top.shows[0].duration, "10:00");

        let discover = &home.channels[1];
        assert_eq!(discover.id, "discover");
        assert_eq!(discover.description, "Random picks from the archive");
        assert_eq!(discover.category, "Discovery");
        assert_eq!(discover.shows[0].title, "Lucky");

        let statements = store.statements().await;
        assert!(statements.iter().any(|s| s.ends_with("LIMIT 12")));
        assert_eq!(statements.len(), 4);
    }

    #[tokio::test]
    async fn test_count_is_clamped() {
        let store = seeded_store().await;
        let svc = DiscoveryService::new(store.clone(), 12);

        svc.load_channels(Some(500)).await.unwrap();
        let statements = store.statements().await;
        assert!(statements.iter().any(|s| s.ends_with("ORDER BY RANDOM() LIMIT 50")));
    }

    #[tokio::test]
    async fn test_slices_clamp_their_own_count() {
        let store = seeded_store().await;
        let svc = DiscoveryService::new(store.clone(), 12);

        svc.load_top(-1).await.unwrap();
        assert!(store.statements().await[0].ends_with("ORDER BY downloads DESC LIMIT 1"));

        store.clear_statements().await;
        svc.load_random(1000).await.unwrap();
        assert!(store.statements().await[0].ends_with("ORDER BY RANDOM() LIMIT 50"));

        store.clear_statements().await;
        svc.load_random(0).await.unwrap();
        assert!(store.statements().await[0].ends_with("ORDER BY RANDOM() LIMIT 1"));
    }

    #[tokio::test]
    async fn test_configured_default_count() {
        let store = seeded_store().await;
        let svc = DiscoveryService::new(store.clone(), 5);
        assert_eq!(svc.default_count(), 5);

        svc.load_channels(None).await.unwrap();
        assert!(store
            .statements()
            .await
            .iter()
            .any(|s| s.ends_with("ORDER BY downloads DESC LIMIT 5")));
    }

    #[tokio::test]
    async fn test_failure_fails_whole_page() {
        let store = seeded_store().await;
        store
            .set_next_error(QueryStoreError::MissingCredentials("api_token".to_string()))
            .await;
        let svc = DiscoveryService::new(store, 12);

        let err = svc.load_channels(None).await.unwrap_err();
        assert!(err.is_configuration());
    }
}
