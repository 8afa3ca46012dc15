//! aq-db - Database layer for askql
//!
//! This crate provides the `SchemaProvider` and `SqlExecutor` traits the
//! pipeline consumes, and their DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::{Database, Row, SchemaProvider, SqlExecutor};
