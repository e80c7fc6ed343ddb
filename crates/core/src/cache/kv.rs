//! Cloudflare Workers KV client over the REST API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

use super::{CacheError, CacheStore};
use crate::config::{non_empty, CloudflareConfig};
use crate::metrics::record_external_call;

/// Body of a KV write.
#[derive(Debug, Serialize)]
struct KvPutBody<'a> {
    value: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_ttl: Option<u64>,
}

/// KV REST client bound to one namespace.
pub struct KvClient {
    client: Client,
    base_url: String,
    api_token: String,
    account_id: String,
    namespace_id: String,
}

impl KvClient {
    /// Create a KV client. Fails when the token, account or namespace is
    /// missing, since there is nothing useful it could do.
    pub fn new(config: &CloudflareConfig) -> Result<Self, CacheError> {
        let api_token = non_empty(&config.api_token)
            .ok_or_else(|| CacheError::NotConfigured("api_token is not set".to_string()))?;
        let account_id = non_empty(&config.account_id)
            .ok_or_else(|| CacheError::NotConfigured("account_id is not set".to_string()))?;
        let namespace_id = non_empty(&config.kv.namespace_id)
            .ok_or_else(|| CacheError::NotConfigured("kv.namespace_id is not set".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            account_id: account_id.to_string(),
            namespace_id: namespace_id.to_string(),
        })
    }

    fn value_url(&self, key: &str) -> String {
        format!(
            "{}/accounts/{}/storage/kv/namespaces/{}/values/{}",
            self.base_url,
            self.account_id,
            self.namespace_id,
            urlencoding::encode(key)
        )
    }

    async fn get_inner(&self, key: &str) -> Result<Option<String>, CacheError> {
        let response = self
            .client
            .get(self.value_url(key))
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CacheError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let text = response.text().await?;
        Ok(if text.is_empty() { None } else { Some(text) })
    }

    async fn put_inner(
        &self,
        key: &str,
        value: &str,
        ttl_secs: Option<u64>,
    ) -> Result<(), CacheError> {
        let body = KvPutBody {
            value,
            expiration_ttl: ttl_secs.filter(|t| *t > 0),
        };

        let response = self
            .client
            .put(self.value_url(key))
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CacheError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for KvClient {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        debug!(key, "KV get");
        let start = Instant::now();
        let result = self.get_inner(key).await;
        record_external_call("kv", "get", start.elapsed().as_secs_f64(), result.is_ok());
        result
    }

    async fn put(
        &self,
        key: &str,
        value: String,
        ttl_secs: Option<u64>,
    ) -> Result<(), CacheError> {
        debug!(key, ttl_secs = ?ttl_secs, "KV put");
        let start = Instant::now();
        let result = self.put_inner(key, &value, ttl_secs).await;
        record_external_call("kv", "put", start.elapsed().as_secs_f64(), result.is_ok());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> CloudflareConfig {
        let mut cfg = CloudflareConfig::default();
        cfg.api_token = Some("token".to_string());
        cfg.account_id = Some("acct".to_string());
        cfg.kv.namespace_id = Some("ns".to_string());
        cfg
    }

    #[test]
    fn test_new_requires_namespace() {
        let mut cfg = full_config();
        cfg.kv.namespace_id = None;
        assert!(matches!(KvClient::new(&cfg), Err(CacheError::NotConfigured(_))));
    }

    #[test]
    fn test_new_requires_credentials() {
        let mut cfg = full_config();
        cfg.api_token = None;
        assert!(matches!(KvClient::new(&cfg), Err(CacheError::NotConfigured(_))));
    }

    #[test]
    fn test_value_url_encodes_key() {
        let client = KvClient::new(&full_config()).unwrap();
        assert_eq!(
            client.value_url("search:v1:1:20:a b/c"),
            "https://api.cloudflare.com/client/v4/accounts/acct/storage/kv/namespaces/ns/values/search%3Av1%3A1%3A20%3Aa%20b%2Fc"
        );
    }

    #[test]
    fn test_put_body_omits_missing_ttl() {
        let body = KvPutBody {
            value: "{}",
            expiration_ttl: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"value":"{}"}"#);

        let body = KvPutBody {
            value: "{}",
            expiration_ttl: Some(300),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"value":"{}","expiration_ttl":300}"#
        );
    }
}
