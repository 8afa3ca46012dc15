//! Allow-list safety gate for generated SQL
//!
//! A blunt, text-level check: the statement must start with `SELECT` and
//! must not contain any write/DDL keyword anywhere, as a substring. A column
//! or literal containing one of the keywords (e.g. `last_update`) is
//! rejected too. Comment or encoding tricks are not considered; the
//! validator's parse is the second line.

use crate::error::{SqlError, SqlResult};

/// Keywords whose presence anywhere in the statement rejects it
pub const FORBIDDEN_KEYWORDS: [&str; 6] =
    ["DROP", "DELETE", "UPDATE", "INSERT", "ALTER", "TRUNCATE"];

/// First forbidden keyword found in `sql`, case-insensitively
pub fn forbidden_keyword(sql: &str) -> Option<&'static str> {
    let upper = sql.to_uppercase();
    FORBIDDEN_KEYWORDS
        .iter()
        .copied()
        .find(|kw| upper.contains(kw))
}

/// True only for a statement that starts with `SELECT` and contains no
/// forbidden keyword
pub fn is_safe_sql(sql: &str) -> bool {
    let upper = sql.to_uppercase();
    upper.trim().starts_with("SELECT") && forbidden_keyword(&upper).is_none()
}

/// Like [`is_safe_sql`], but says why a statement was rejected
pub fn ensure_safe_sql(sql: &str) -> SqlResult<()> {
    if !sql.to_uppercase().trim().starts_with("SELECT") {
        return Err(SqlError::UnsafeSql {
            reason: "statement does not start with SELECT".to_string(),
        });
    }
    if let Some(kw) = forbidden_keyword(sql) {
        return Err(SqlError::UnsafeSql {
            reason: format!("forbidden keyword {kw}"),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "safety_test.rs"]
mod tests;
