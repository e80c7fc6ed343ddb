use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cloudflare: CloudflareConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Cloudflare account credentials shared by the D1 and KV clients.
///
/// Token and account id are optional at load time so the server can start
/// without them; every remote call checks for them before touching the
/// network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloudflareConfig {
    /// API token sent as a bearer token.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Account identifier.
    #[serde(default)]
    pub account_id: Option<String>,
    /// REST API base URL (default: https://api.cloudflare.com/client/v4).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    #[serde(default)]
    pub d1: D1Config,
    #[serde(default)]
    pub kv: KvConfig,
}

impl Default for CloudflareConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            account_id: None,
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout(),
            d1: D1Config::default(),
            kv: KvConfig::default(),
        }
    }
}

impl CloudflareConfig {
    /// Whether both the API token and the account id are present.
    pub fn has_credentials(&self) -> bool {
        non_empty(&self.api_token).is_some() && non_empty(&self.account_id).is_some()
    }
}

fn default_api_base_url() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// D1 database selection. The id wins over the name when both are set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct D1Config {
    #[serde(default)]
    pub database_id: Option<String>,
    #[serde(default = "default_database_name")]
    pub database_name: String,
}

impl Default for D1Config {
    fn default() -> Self {
        Self {
            database_id: None,
            database_name: default_database_name(),
        }
    }
}

fn default_database_name() -> String {
    "radio-archive-catalog".to_string()
}

/// KV namespace used for result caching. Caching is disabled when unset.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KvConfig {
    #[serde(default)]
    pub namespace_id: Option<String>,
}

/// Fixed-window request limits applied at the HTTP boundary.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
        }
    }
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_requests() -> u32 {
    60
}

/// Search result caching.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// TTL for cached search pages, in seconds (default: 300)
    #[serde(default = "default_search_ttl")]
    pub search_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            search_ttl_secs: default_search_ttl(),
        }
    }
}

fn default_search_ttl() -> u64 {
    300
}

/// Home page discovery slices.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// Shows per channel when the request does not say (default: 12)
    #[serde(default = "default_discovery_count")]
    pub count: u32,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            count: default_discovery_count(),
        }
    }
}

fn default_discovery_count() -> u32 {
    12
}

/// Upper bound for configured durations (rate limit window, cache TTL): one year.
pub const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub cloudflare: SanitizedCloudflareConfig,
    pub rate_limit: RateLimitConfig,
    pub cache: CacheConfig,
    pub discovery: DiscoveryConfig,
}

/// Sanitized Cloudflare config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCloudflareConfig {
    pub api_token_configured: bool,
    pub account_id_configured: bool,
    pub api_base_url: String,
    pub timeout_secs: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
    pub database_name: String,
    pub kv_enabled: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let cf = &config.cloudflare;
        Self {
            server: config.server.clone(),
            cloudflare: SanitizedCloudflareConfig {
                api_token_configured: non_empty(&cf.api_token).is_some(),
                account_id_configured: non_empty(&cf.account_id).is_some(),
                api_base_url: cf.api_base_url.clone(),
                timeout_secs: cf.timeout_secs,
                database_id: cf.d1.database_id.clone(),
                database_name: cf.d1.database_name.clone(),
                kv_enabled: non_empty(&cf.kv.namespace_id).is_some(),
            },
            rate_limit: config.rate_limit.clone(),
            cache: config.cache.clone(),
            discovery: config.discovery.clone(),
        }
    }
}
