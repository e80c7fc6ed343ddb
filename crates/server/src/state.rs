use std::sync::Arc;

use dramas_core::{
    CatalogService, Config, DiscoveryService, QueryStore, RateLimiter, ResultCache,
    SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: CatalogService,
    discovery: DiscoveryService,
    rate_limiter: RateLimiter,
    cache_enabled: bool,
}

impl AppState {
    /// Wire the catalog services around one query store and result cache.
    pub fn new(config: Config, store: Arc<dyn QueryStore>, cache: ResultCache) -> Self {
        let cache_enabled = cache.is_enabled();
        let catalog = CatalogService::new(Arc::clone(&store), cache, config.cache.search_ttl_secs);
        let discovery = DiscoveryService::new(store, config.discovery.count);
        let rate_limiter = RateLimiter::from_config(&config.rate_limit);

        Self {
            config,
            catalog,
            discovery,
            rate_limiter,
            cache_enabled,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn discovery(&self) -> &DiscoveryService {
        &self.discovery
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }
}
