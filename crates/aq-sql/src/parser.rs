//! SQL parser wrapper

use crate::dialect::{DuckDbDialect, SqlDialect};
use crate::error::{SqlError, SqlResult};
use sqlparser::ast::Statement;

/// SQL parser that wraps sqlparser-rs with dialect support
pub struct SqlParser {
    dialect: Box<dyn SqlDialect>,
}

impl SqlParser {
    /// Create a new parser with DuckDB dialect
    pub fn duckdb() -> Self {
        Self {
            dialect: Box::new(DuckDbDialect::new()),
        }
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        self.dialect.parse(sql)
    }

    /// Get the dialect name
    pub fn dialect_name(&self) -> &'static str {
        self.dialect.name()
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::duckdb()
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
