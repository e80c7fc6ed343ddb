//! Cloudflare D1 client over the REST API.
//!
//! The database id is resolved once per client: either taken from
//! configuration or looked up by name in the account's database listing.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::types::{DatabaseListing, QueryEnvelope, RowSet};
use super::{QueryStore, QueryStoreError};
use crate::config::{non_empty, CloudflareConfig};
use crate::metrics::record_external_call;

/// D1 REST client.
pub struct D1Client {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    account_id: Option<String>,
    database_name: String,
    database_id: OnceCell<String>,
}

impl D1Client {
    /// Create a new D1 client.
    ///
    /// Missing credentials are not an error here; they are reported by the
    /// first call that needs them.
    pub fn new(config: &CloudflareConfig) -> Result<Self, QueryStoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let database_id = non_empty(&config.d1.database_id).map(str::to_string);

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_token: non_empty(&config.api_token).map(str::to_string),
            account_id: non_empty(&config.account_id).map(str::to_string),
            database_name: config.d1.database_name.clone(),
            database_id: OnceCell::new_with(database_id),
        })
    }

    fn credentials(&self) -> Result<(&str, &str), QueryStoreError> {
        match (self.api_token.as_deref(), self.account_id.as_deref()) {
            (Some(token), Some(account)) => Ok((token, account)),
            (None, _) => Err(QueryStoreError::MissingCredentials(
                "api_token (CF_API_TOKEN) is not set".to_string(),
            )),
            (_, None) => Err(QueryStoreError::MissingCredentials(
                "account_id (CF_ACCOUNT_ID) is not set".to_string(),
            )),
        }
    }

    /// The database id, resolving it by name on first use.
    pub async fn database_id(&self) -> Result<String, QueryStoreError> {
        let (token, account) = self.credentials()?;
        self.database_id
            .get_or_try_init(|| self.resolve_database_id(token, account))
            .await
            .cloned()
    }

    async fn resolve_database_id(
        &self,
        token: &str,
        account: &str,
    ) -> Result<String, QueryStoreError> {
        if self.database_name.trim().is_empty() {
            return Err(QueryStoreError::NotConfigured(
                "neither d1.database_id nor d1.database_name is set".to_string(),
            ));
        }

        let url = format!("{}/accounts/{}/d1/database", self.base_url, account);
        debug!(name = %self.database_name, "Resolving D1 database by name");

        let request = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("per_page", "100")]);
        let listing: DatabaseListing = self.send(request, "list_databases").await?;

        let found = listing
            .result
            .into_iter()
            .find(|db| db.name == self.database_name)
            .ok_or_else(|| QueryStoreError::DatabaseNotFound {
                name: self.database_name.clone(),
                account_id: account.to_string(),
            })?;

        info!(name = %self.database_name, id = %found.uuid, "Resolved D1 database");
        Ok(found.uuid)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> Result<T, QueryStoreError> {
        let start = Instant::now();
        let result = self.send_inner(request).await;
        record_external_call("d1", operation, start.elapsed().as_secs_f64(), result.is_ok());
        result
    }

    async fn send_inner<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, QueryStoreError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryStoreError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| {
            QueryStoreError::ParseError(format!("Failed to parse D1 response: {}", e))
        })
    }
}

#[async_trait]
impl QueryStore for D1Client {
    async fn execute(&self, statement: &str) -> Result<RowSet, QueryStoreError> {
        let (token, account) = self.credentials()?;
        let database_id = self.database_id().await?;

        let url = format!(
            "{}/accounts/{}/d1/database/{}/query",
            self.base_url, account, database_id
        );
        debug!(sql = statement, "D1 query");

        let request = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "sql": statement }));
        let envelope: QueryEnvelope = self.send(request, "query").await?;

        if !envelope.success {
            return Err(QueryStoreError::ApiError {
                status: 200,
                message: envelope.error_summary(),
            });
        }

        Ok(RowSet::new(envelope.result))
    }
}
