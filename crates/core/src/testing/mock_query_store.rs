//! Mock query store for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::query_store::{QueryStore, QueryStoreError, Row, RowSet};

/// Canned rows returned for statements containing `fragment`.
#[derive(Debug, Clone)]
struct Rule {
    fragment: String,
    rows: Vec<Row>,
}

/// Mock implementation of the QueryStore trait.
///
/// Provides controllable behavior for testing:
/// - Return canned rows for statements matching a text fragment
/// - Record every statement for assertions
/// - Simulate failures
///
/// Rules are checked in the order they were added; the first rule whose
/// fragment occurs in the statement wins. Unmatched statements return no
/// rows.
///
/// # Example
///
/// ```rust,ignore
/// use dramas_core::testing::{fixtures, MockQueryStore};
///
/// let store = MockQueryStore::new();
/// store.respond_when("COUNT(*)", vec![fixtures::row(json!({ "c": 1 }))]).await;
///
/// let rows = store.execute("SELECT COUNT(*) AS c FROM radio_shows").await?;
/// assert_eq!(rows.scalar_i64("c"), Some(1));
/// assert_eq!(store.statement_count().await, 1);
/// ```
#[derive(Debug, Default)]
pub struct MockQueryStore {
    /// Response rules in insertion order.
    rules: Arc<RwLock<Vec<Rule>>>,
    /// Recorded statements.
    statements: Arc<RwLock<Vec<String>>>,
    /// If set, the next execute will fail with this error.
    next_error: Arc<RwLock<Option<QueryStoreError>>>,
}

impl MockQueryStore {
    /// Create a new mock store with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Test Helpers
    // =========================================================================

    /// Return `rows` for statements containing `fragment`.
    pub async fn respond_when(&self, fragment: &str, rows: Vec<Row>) {
        self.rules.write().await.push(Rule {
            fragment: fragment.to_string(),
            rows,
        });
    }

    /// Make the next execute fail with `error`.
    pub async fn set_next_error(&self, error: QueryStoreError) {
        *self.next_error.write().await = Some(error);
    }

    /// All statements executed so far, in order.
    pub async fn statements(&self) -> Vec<String> {
        self.statements.read().await.clone()
    }

    pub async fn statement_count(&self) -> usize {
        self.statements.read().await.len()
    }

    pub async fn clear_statements(&self) {
        self.statements.write().await.clear();
    }
}

#[async_trait]
impl QueryStore for MockQueryStore {
    async fn execute(&self, statement: &str) -> Result<RowSet, QueryStoreError> {
        self.statements.write().await.push(statement.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let rules = self.rules.read().await;
        let rows = rules
            .iter()
            .find(|rule| statement.contains(&rule.fragment))
            .map(|rule| rule.rows.clone())
            .unwrap_or_default();

        Ok(RowSet::single(rows))
    }
}
