//! aq-core - Core library for askql
//!
//! This crate provides the per-request schema snapshot types, the
//! relationship (join key) map, and `askql.yml` configuration parsing shared
//! by every other askql crate.

pub mod config;
pub mod error;
pub mod relationships;
pub mod schema;
pub mod table_name;

pub use config::{Config, DatabaseConfig, ServerConfig, VocabularyConfig};
pub use error::{CoreError, CoreResult};
pub use relationships::{JoinKeys, RelationshipMap};
pub use schema::{ColumnDef, Schema, SchemaBuilder, TableSchema};
pub use table_name::TableName;
