use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Flat environment names understood alongside `DRAMAS_*` overrides.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("CF_API_TOKEN", "cloudflare.api_token"),
    ("CF_ACCOUNT_ID", "cloudflare.account_id"),
    ("CF_D1_DB_ID", "cloudflare.d1.database_id"),
    ("CF_D1_DB_NAME", "cloudflare.d1.database_name"),
    ("CF_KV_NAMESPACE_ID", "cloudflare.kv.namespace_id"),
];

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    with_env(Figment::new().merge(Toml::file(path)))
}

/// Load configuration from the environment only (no config file)
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    with_env(Figment::new())
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn with_env(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .merge(legacy_env())
        .merge(Env::prefixed("DRAMAS_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn legacy_env() -> Env {
    Env::raw().filter_map(|key| {
        LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| key == *name)
            .map(|(_, path)| (*path).into())
    })
}
