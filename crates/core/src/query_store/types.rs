use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// A single result row, keyed by column name.
pub type Row = Map<String, Value>;

/// Rows produced by one statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultGroup {
    #[serde(default)]
    pub results: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl ResultGroup {
    pub fn new(results: Vec<Row>) -> Self {
        Self {
            results,
            success: Some(true),
        }
    }
}

/// Normalized response of a query: one group per executed statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub groups: Vec<ResultGroup>,
}

impl RowSet {
    pub fn new(groups: Vec<ResultGroup>) -> Self {
        Self { groups }
    }

    /// A row set with a single group of `rows`.
    pub fn single(rows: Vec<Row>) -> Self {
        Self::new(vec![ResultGroup::new(rows)])
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Rows of the first group, or an empty slice.
    pub fn rows(&self) -> &[Row] {
        self.groups
            .first()
            .map(|g| g.results.as_slice())
            .unwrap_or(&[])
    }

    pub fn first_row(&self) -> Option<&Row> {
        self.rows().first()
    }

    /// Integer value of `column` in the first row.
    ///
    /// Accepts JSON numbers and numeric strings.
    pub fn scalar_i64(&self, column: &str) -> Option<i64> {
        self.first_row()
            .and_then(|row| row.get(column))
            .and_then(super::lenient::value_as_i64)
    }

    /// Decode the first group's rows into `T`.
    ///
    /// Rows that do not decode are skipped and logged.
    pub fn decode_rows<T: DeserializeOwned>(&self) -> Vec<T> {
        self.rows()
            .iter()
            .filter_map(|row| match serde_json::from_value(Value::Object(row.clone())) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    warn!(error = %e, "Skipping undecodable row");
                    None
                }
            })
            .collect()
    }
}

/// Message entry in the Cloudflare API envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

/// Response envelope of the D1 query endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryEnvelope {
    #[serde(default)]
    pub result: Vec<ResultGroup>,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    #[allow(dead_code)]
    pub messages: Vec<ApiMessage>,
}

fn default_success() -> bool {
    true
}

impl QueryEnvelope {
    /// Error text for an envelope that reports `success: false`.
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "query reported failure".to_string();
        }
        self.errors
            .iter()
            .map(|e| match e.code {
                Some(code) => format!("{} ({})", e.message, code),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Entry of the D1 database listing.
#[derive(Debug, Deserialize)]
pub(crate) struct DatabaseListing {
    #[serde(default)]
    pub result: Vec<DatabaseInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatabaseInfo {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub name: String,
}
