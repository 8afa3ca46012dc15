//! Database trait definitions

use crate::error::DbResult;
use aq_core::Schema;
use async_trait::async_trait;

/// One result row: column name → JSON value, in result column order
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Source of the per-request schema snapshot
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    /// Fetch a fresh schema snapshot. Never cached.
    async fn fetch_schema(&self) -> DbResult<Schema>;
}

/// Runs validated SELECT statements
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Execute `sql`, binding `params` to its `?` placeholders in order.
    ///
    /// Single attempt; driver errors are returned as-is.
    async fn execute_query(&self, sql: &str, params: &[String]) -> DbResult<Vec<Row>>;
}

/// Full backend used by the CLI and HTTP server
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: SchemaProvider + SqlExecutor {
    /// Execute multiple SQL statements (setup scripts)
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Round-trip a trivial query to prove the connection works
    async fn ping(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
