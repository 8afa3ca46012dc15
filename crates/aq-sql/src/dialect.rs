//! SQL dialect abstraction

use sqlparser::ast::Statement;
use sqlparser::dialect::{Dialect, DuckDbDialect as SqlParserDuckDb};
use sqlparser::parser::Parser;

use crate::error::{SqlError, SqlResult};

/// Trait for SQL dialect implementations
pub trait SqlDialect: Send + Sync {
    /// Get the underlying sqlparser dialect
    fn parser_dialect(&self) -> &dyn Dialect;

    /// Parse SQL into AST statements
    fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        Parser::parse_sql(self.parser_dialect(), sql).map_err(|e| {
            let msg = e.to_string();
            let (line, column) = parse_location_from_error(&msg);
            SqlError::ParseError {
                message: msg,
                line,
                column,
            }
        })
    }

    /// Get the dialect name
    fn name(&self) -> &'static str;
}

/// Pull "Line: N, Column: M" out of a sqlparser error message.
///
/// `ParserError` carries no structured location, only the message text.
/// Returns `(0, 0)` when the message has no location.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    let number_after = |label: &str| -> Option<usize> {
        let start = msg.find(label)? + label.len();
        let digits: String = msg[start..]
            .chars()
            .skip_while(|c| c.is_whitespace())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    };

    match (number_after("Line:"), number_after("Column:")) {
        (Some(line), Some(column)) => (line, column),
        _ => (0, 0),
    }
}

/// DuckDB SQL dialect, the dialect of the executing backend
pub struct DuckDbDialect {
    dialect: SqlParserDuckDb,
}

impl DuckDbDialect {
    /// Create a new DuckDB dialect
    pub fn new() -> Self {
        Self {
            dialect: SqlParserDuckDb {},
        }
    }
}

impl Default for DuckDbDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for DuckDbDialect {
    fn parser_dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn name(&self) -> &'static str {
        "duckdb"
    }
}
