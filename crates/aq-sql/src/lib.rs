//! aq-sql - SQL layer for askql
//!
//! This crate provides the two gates generated SQL passes before it is
//! executed: a text-level allow-list safety check and a parser-based
//! validator that re-derives tables and columns and checks them against the
//! schema snapshot.

pub mod dialect;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod safety;
pub mod validator;

pub use dialect::{DuckDbDialect, SqlDialect};
pub use error::{SqlError, SqlResult};
pub use extractor::extract_tables;
pub use parser::SqlParser;
pub use safety::{ensure_safe_sql, is_safe_sql, FORBIDDEN_KEYWORDS};
pub use validator::{validate, ValidatedQuery, ValidationFailure, ValidationResult};
