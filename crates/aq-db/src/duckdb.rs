//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Row, SchemaProvider, SqlExecutor};
use aq_core::{ColumnDef, DatabaseConfig, Schema, SchemaBuilder};
use async_trait::async_trait;
use duckdb::types::ValueRef;
use duckdb::Connection;
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const DEFAULT_SCHEMA: &str = "main";

const SCHEMA_QUERY: &str = "SELECT table_name, column_name, data_type \
     FROM information_schema.columns \
     WHERE table_catalog = current_database() AND table_schema = ? \
     ORDER BY table_name, ordinal_position";

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
    schema: String,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::with_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::with_connection(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Open the configured database, run its `on_start` scripts, and make
    /// the configured schema the default for unqualified table names.
    pub fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        let backend = Self::new(&config.path)?.with_schema(&config.schema)?;
        for script in &config.on_start {
            backend.execute_batch_sync(script)?;
        }
        if backend.schema != DEFAULT_SCHEMA {
            backend.execute_batch_sync(&format!("SET schema = '{}'", backend.schema))?;
        }
        log::info!(
            "Opened DuckDB database '{}' (schema '{}')",
            config.path,
            backend.schema
        );
        Ok(backend)
    }

    /// Introspect `schema` instead of `main`
    pub fn with_schema(mut self, schema: &str) -> DbResult<Self> {
        if schema.is_empty()
            || !schema
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(DbError::InvalidIdentifier(schema.to_string()));
        }
        self.schema = schema.to_string();
        Ok(self)
    }

    /// Schema whose tables are introspected
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    fn with_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Read the schema snapshot synchronously
    fn fetch_schema_sync(&self) -> DbResult<Schema> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(SCHEMA_QUERY)
            .map_err(|e| DbError::SchemaError(e.to_string()))?;
        let columns = stmt
            .query_map([self.schema.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })
            .map_err(|e| DbError::SchemaError(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::SchemaError(e.to_string()))?;
        drop(stmt);
        drop(conn);

        let mut builder = SchemaBuilder::default();
        for (table, column, data_type) in columns {
            let column = match data_type {
                Some(data_type) => ColumnDef::typed(column, data_type),
                None => ColumnDef::new(column),
            };
            builder.push_column(&table, column)?;
        }
        let schema = builder.build();
        log::debug!(
            "Fetched schema '{}' with {} table(s)",
            self.schema,
            schema.len()
        );
        Ok(schema)
    }

    /// Execute a query synchronously and collect rows as JSON objects.
    ///
    /// DuckDB 1.4 panics on `stmt.column_count()` before execution, so rows
    /// are collected via `query_map` first and column names read afterwards.
    fn execute_query_sync(&self, sql: &str, params: &[String]) -> DbResult<Vec<Row>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        let raw_rows: Vec<Vec<Value>> = stmt
            .query_map(duckdb::params_from_iter(params.iter()), |row| {
                let col_count = row.as_ref().column_count();
                Ok((0..col_count).map(|i| column_value(row, i)).collect())
            })
            .map_err(|e| DbError::ExecutionError(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        let column_names: Vec<String> = (0..stmt.column_count())
            .map(|i| stmt.column_name(i).map_or("?".to_string(), |v| v.to_string()))
            .collect();

        Ok(raw_rows
            .into_iter()
            .map(|values| column_names.iter().cloned().zip(values).collect())
            .collect())
    }
}

/// Convert one result cell to JSON.
///
/// Types without a direct JSON counterpart fall back to their string form,
/// then to a float, then to null.
fn column_value(row: &duckdb::Row<'_>, idx: usize) -> Value {
    let Ok(value) = row.get_ref(idx) else {
        return Value::Null;
    };
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(n) => n.into(),
        ValueRef::SmallInt(n) => n.into(),
        ValueRef::Int(n) => n.into(),
        ValueRef::BigInt(n) => n.into(),
        ValueRef::UTinyInt(n) => n.into(),
        ValueRef::USmallInt(n) => n.into(),
        ValueRef::UInt(n) => n.into(),
        ValueRef::UBigInt(n) => n.into(),
        ValueRef::Float(f) => f64::from(f).into(),
        ValueRef::Double(f) => f.into(),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        _ => {
            if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
                return Value::String(s);
            }
            if let Ok(Some(f)) = row.get::<_, Option<f64>>(idx) {
                return f.into();
            }
            Value::Null
        }
    }
}

#[async_trait]
impl SchemaProvider for DuckDbBackend {
    async fn fetch_schema(&self) -> DbResult<Schema> {
        self.fetch_schema_sync()
    }
}

#[async_trait]
impl SqlExecutor for DuckDbBackend {
    async fn execute_query(&self, sql: &str, params: &[String]) -> DbResult<Vec<Row>> {
        self.execute_query_sync(sql, params)
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn ping(&self) -> DbResult<()> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
