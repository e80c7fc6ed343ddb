//! Types for the radio show catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::query_store::{lenient, QueryStoreError};

/// Default page size when the caller does not give one.
pub const DEFAULT_LIMIT: i64 = 20;
/// Largest page size a caller may request.
pub const MAX_LIMIT: i64 = 50;

/// A catalog record as stored in the `radio_shows` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    /// External archive identifier.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub identifier: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    /// Stored as either a number or text; always surfaced as text.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub year: Option<String>,
    /// Popularity counter.
    #[serde(default, deserialize_with = "lenient::i64_or_zero")]
    pub downloads: i64,
}

/// A playable file from the `audio_files` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::id")]
    pub radio_show_id: i64,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub streaming_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub download_url: Option<String>,
    /// Length in seconds.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub duration: Option<f64>,
}

/// A free-text catalog search.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: String,
    /// 1-based page number.
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            page: None,
            limit: None,
        }
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether the term has no searchable content.
    pub fn is_blank(&self) -> bool {
        self.term.trim().is_empty()
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// The term as matched against the catalog: lower-cased, surrounding
    /// whitespace kept, so `" mars"` only matches where a space precedes it.
    pub fn normalized_term(&self) -> String {
        self.term.to_lowercase()
    }

    /// Cache key for this query's result page.
    ///
    /// The numeric parts come first and the term is hashed, so keys are
    /// unambiguous and bounded in length whatever the term contains.
    pub fn cache_key(&self) -> String {
        let digest = Sha256::digest(self.normalized_term().as_bytes());
        format!("search:v1:{}:{}:{:x}", self.page(), self.limit(), digest)
    }
}

/// Quality scores shown alongside a show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowQuality {
    pub audio_quality: u8,
    pub transcription_accuracy: u8,
    pub user_reports: u32,
}

impl Default for ShowQuality {
    fn default() -> Self {
        Self {
            audio_quality: 3,
            transcription_accuracy: 3,
            user_reports: 0,
        }
    }
}

/// Public shape of a show in list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowSummary {
    pub id: String,
    pub title: String,
    pub series: String,
    /// `"M:00"`, or empty when no duration is known.
    pub duration: String,
    pub year: String,
    pub description: String,
    pub archive_url: String,
    pub genre: Vec<String>,
    pub actors: Vec<String>,
    pub rating: f64,
    pub play_count: i64,
    pub tags: Vec<String>,
    pub quality: ShowQuality,
}

/// Count-by-category summaries. Not computed yet, so always empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facets {
    pub genres: BTreeMap<String, u64>,
    pub years: BTreeMap<String, u64>,
    pub series: BTreeMap<String, u64>,
    pub actors: BTreeMap<String, u64>,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultPage {
    pub shows: Vec<ShowSummary>,
    pub total_count: i64,
    pub facets: Facets,
}

/// What a search stores in the result cache: everything needed to rebuild
/// the page without touching the query store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedSearch {
    pub total: i64,
    pub items: Vec<CatalogItem>,
    /// Representative asset by owning item id.
    pub assets: BTreeMap<i64, MediaAsset>,
}

/// A show with all of its files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowDetail {
    pub item: CatalogItem,
    pub media_assets: Vec<MediaAsset>,
}

/// A curated list of shows on the home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub featured: bool,
    pub category: String,
    pub curated_by: String,
    pub shows: Vec<ShowSummary>,
}

/// Home page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomePage {
    pub channels: Vec<Channel>,
}

/// Errors that can occur in catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The query store failed or is not configured.
    #[error(transparent)]
    Store(#[from] QueryStoreError),

    /// Caller input was rejected.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_configuration())
    }
}
