pub mod cache;
pub mod catalog;
pub mod config;
pub mod metrics;
pub mod query_store;
pub mod rate_limiter;
pub mod testing;

pub use cache::{CacheError, CacheLookup, CacheStore, KvClient, ResultCache};
pub use catalog::{
    CatalogError, CatalogService, Channel, DiscoveryService, HomePage, SearchQuery,
    SearchResultPage, ShowDetail, ShowSummary,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, SanitizedConfig,
};
pub use query_store::{D1Client, QueryStore, QueryStoreError, RowSet};
pub use rate_limiter::{RateLimitStatus, RateLimiter};
