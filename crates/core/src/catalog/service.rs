use std::sync::Arc;

use tracing::{debug, instrument};

use super::assets::fetch_representatives;
use super::mapping::map_shows;
use super::sql;
use super::types::{
    CachedSearch, CatalogError, CatalogItem, MediaAsset, SearchQuery, SearchResultPage,
    ShowDetail,
};
use crate::cache::{CacheLookup, ResultCache};
use crate::metrics::SEARCH_RESULTS;
use crate::query_store::QueryStore;

/// Most files returned for a single show.
pub const MAX_ASSETS_PER_SHOW: i64 = 100;

/// Search and single-show lookup over the catalog store.
pub struct CatalogService {
    store: Arc<dyn QueryStore>,
    cache: ResultCache,
    search_ttl_secs: Option<u64>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn QueryStore>, cache: ResultCache, search_ttl_secs: u64) -> Self {
        Self {
            store,
            cache,
            search_ttl_secs: Some(search_ttl_secs).filter(|t| *t > 0),
        }
    }

    /// Run a free-text search.
    ///
    /// A blank term yields an empty page without touching the store or the
    /// cache. Results come from the cache when a live entry exists;
    /// otherwise the count, rows and representative assets are fetched in
    /// sequence and the combined result is cached.
    #[instrument(skip(self), fields(term = %query.term))]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResultPage, CatalogError> {
        if query.is_blank() {
            return Ok(SearchResultPage::default());
        }

        let key = query.cache_key();
        let cached = match self.cache.get_json::<CachedSearch>(&key).await {
            CacheLookup::Hit(cached) => {
                debug!(key = %key, "Search served from cache");
                cached
            }
            CacheLookup::Miss | CacheLookup::Unavailable => {
                let fresh = self.fetch(query).await?;
                self.cache.put_json(&key, &fresh, self.search_ttl_secs).await;
                fresh
            }
        };

        SEARCH_RESULTS.observe(cached.total as f64);

        Ok(SearchResultPage {
            shows: map_shows(&cached.items, &cached.assets),
            total_count: cached.total,
            facets: Default::default(),
        })
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<CachedSearch, CatalogError> {
        let term = query.normalized_term();

        let total = self
            .store
            .execute(&sql::search_count(&term))
            .await?
            .scalar_i64("c")
            .unwrap_or(0);

        let items: Vec<CatalogItem> = self
            .store
            .execute(&sql::search_rows(&term, query.limit(), query.offset()))
            .await?
            .decode_rows();

        let assets = fetch_representatives(self.store.as_ref(), &items).await?;

        debug!(total, returned = items.len(), "Search fetched from store");
        Ok(CachedSearch {
            total,
            items,
            assets,
        })
    }

    /// Load one show and its files, ordered by file id.
    #[instrument(skip(self))]
    pub async fn show_detail(&self, id: i64) -> Result<ShowDetail, CatalogError> {
        let item = self
            .store
            .execute(&sql::show_by_id(id))
            .await?
            .decode_rows::<CatalogItem>()
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(format!("show {}", id)))?;

        let media_assets: Vec<MediaAsset> = self
            .store
            .execute(&sql::assets_for_show(id, MAX_ASSETS_PER_SHOW))
            .await?
            .decode_rows();

        Ok(ShowDetail { item, media_assets })
    }

    /// Parse a show id from a path segment.
    pub fn parse_show_id(raw: &str) -> Result<i64, CatalogError> {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| CatalogError::Validation(format!("invalid show id: {}", raw)))
    }
}
