//! SQL synthesis from an [`Intent`]

use crate::error::{TranslateError, TranslateResult};
use crate::intent::{Intent, GROUP_COLUMN};
use aq_sql::ensure_safe_sql;
use serde::Serialize;

/// Projection used for count questions
pub const COUNT_EXPR: &str = "COUNT(*) AS count";

/// A synthesized SELECT statement.
///
/// `sql` is what gets executed: user-derived literals are `?` placeholders
/// bound from `params` in order. `display_sql` inlines the same literals as
/// escaped string literals for showing to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSql {
    pub sql: String,
    pub display_sql: String,
    pub params: Vec<String>,
}

/// Build the statement for an intent and pass it through the safety gate
pub fn synthesize(intent: &Intent) -> TranslateResult<GeneratedSql> {
    let table = intent.table.as_deref().ok_or(TranslateError::NoTableDetected)?;

    let projection = if intent.is_grouped_count() {
        format!("{GROUP_COLUMN}, {COUNT_EXPR}")
    } else if intent.aggregate {
        COUNT_EXPR.to_string()
    } else if intent.columns.is_empty() {
        "*".to_string()
    } else {
        intent.columns.join(", ")
    };

    let mut sql = format!("SELECT {projection} FROM {table}");
    let mut display_sql = sql.clone();
    let mut params = Vec::new();

    if let Some(city) = &intent.city {
        sql.push_str(&format!(" WHERE {GROUP_COLUMN} = ?"));
        display_sql.push_str(&format!(" WHERE {GROUP_COLUMN} = {}", quote_literal(city)));
        params.push(city.clone());
    }

    let mut tail = String::new();
    if intent.is_grouped_count() {
        tail.push_str(&format!(" GROUP BY {GROUP_COLUMN}"));
    }
    if let Some(col) = &intent.order_by {
        tail.push_str(&format!(" ORDER BY {col} ASC"));
    }
    if let Some(n) = intent.limit {
        tail.push_str(&format!(" LIMIT {n}"));
    }
    tail.push(';');
    sql.push_str(&tail);
    display_sql.push_str(&tail);

    ensure_safe_sql(&sql)?;
    log::debug!("Synthesized SQL: {}", display_sql);
    Ok(GeneratedSql {
        sql,
        display_sql,
        params,
    })
}

/// Render a string as a single-quoted SQL literal
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
#[path = "synthesizer_test.rs"]
mod tests;
