use super::{
    types::{Config, MAX_DURATION_SECS},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Rate limit window and request budget are positive
/// - Rate limit window and search cache TTL are at most one year
/// - Remote call timeout is positive
///
/// Missing Cloudflare credentials are not a validation failure: the server
/// starts and every catalog call reports them instead.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.rate_limit.window_secs == 0 {
        return Err(ConfigError::ValidationError(
            "rate_limit.window_secs cannot be 0".to_string(),
        ));
    }

    if config.rate_limit.window_secs > MAX_DURATION_SECS {
        return Err(ConfigError::ValidationError(format!(
            "rate_limit.window_secs cannot exceed {}",
            MAX_DURATION_SECS
        )));
    }

    if config.cache.search_ttl_secs > MAX_DURATION_SECS {
        return Err(ConfigError::ValidationError(format!(
            "cache.search_ttl_secs cannot exceed {}",
            MAX_DURATION_SECS
        )));
    }

    if config.rate_limit.max_requests == 0 {
        return Err(ConfigError::ValidationError(
            "rate_limit.max_requests cannot be 0".to_string(),
        ));
    }

    if config.cloudflare.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "cloudflare.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use std::net::IpAddr;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Config::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_rate_limit_fails() {
        let mut config = Config::default();
        config.rate_limit.max_requests = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.rate_limit.window_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_window_upper_bound() {
        let mut config = Config::default();
        config.rate_limit.window_secs = MAX_DURATION_SECS;
        assert!(validate_config(&config).is_ok());

        config.rate_limit.window_secs = MAX_DURATION_SECS + 1;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("rate_limit.window_secs"));
    }

    #[test]
    fn test_validate_search_ttl_upper_bound() {
        let mut config = Config::default();
        config.cache.search_ttl_secs = MAX_DURATION_SECS;
        assert!(validate_config(&config).is_ok());

        config.cache.search_ttl_secs = 10_000_000_000_000;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("cache.search_ttl_secs"));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.cloudflare.timeout_secs = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }
}
