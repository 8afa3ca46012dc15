//! Intent extraction
//!
//! Turns a normalized question into a structured [`Intent`] using plain
//! substring and regex matching against the schema snapshot and the
//! configured vocabulary. Every helper here is pure; the same question and
//! schema always yield the same intent.

use crate::error::{TranslateError, TranslateResult};
use crate::normalizer::NormalizedQuestion;
use aq_core::{Schema, TableSchema, VocabularyConfig};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Column that the grouping phrase and the city filter refer to
pub const GROUP_COLUMN: &str = "city";

/// Phrase that turns a question into a per-city breakdown
const GROUP_PHRASE: &str = "by city";

/// Structured reading of a question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Intent {
    /// Target table
    pub table: Option<String>,
    /// Requested columns, in schema order
    pub columns: Vec<String>,
    /// Equality filter value for the city column, in configured casing
    pub city: Option<String>,
    /// COUNT(*) instead of a column projection
    pub aggregate: bool,
    /// Break the count down per city
    pub group_by_city: bool,
    /// Ascending sort column
    pub order_by: Option<String>,
    /// Row limit
    pub limit: Option<u64>,
}

impl Intent {
    /// Whether the question asks for a grouped count
    pub fn is_grouped_count(&self) -> bool {
        self.aggregate && self.group_by_city
    }
}

/// Extract the full intent of a normalized question
pub fn extract_intent(
    question: &NormalizedQuestion,
    schema: &Schema,
    vocabulary: &VocabularyConfig,
) -> TranslateResult<Intent> {
    let q = question.as_str();
    let table = detect_table(q, schema)?;
    let aggregate = is_count_query(q, &vocabulary.count_phrases);
    let group_by_city = is_group_by_city(q);
    let grouped = aggregate && group_by_city;
    let order_by = extract_order_by(q, table, grouped);
    let columns = detect_columns(q, table, order_by.as_deref(), grouped);

    let intent = Intent {
        table: Some(table.name.to_string()),
        columns,
        city: extract_city(q, &vocabulary.cities),
        aggregate,
        group_by_city,
        order_by,
        limit: extract_limit(q),
    };
    log::debug!("Extracted intent: {:?}", intent);
    Ok(intent)
}

/// First schema table whose name occurs in the question.
///
/// Falls back to the only table of a single-table schema.
pub fn detect_table<'a>(q: &str, schema: &'a Schema) -> TranslateResult<&'a TableSchema> {
    if let Some(table) = schema.tables().iter().find(|t| q.contains(t.name.as_str())) {
        return Ok(table);
    }
    match schema.tables() {
        [only] => Ok(only),
        _ => Err(TranslateError::NoTableDetected),
    }
}

/// Columns of `table` mentioned in the question, in schema order.
///
/// Sort and grouping phrases are stripped first so their column is not
/// projected as well.
pub fn detect_columns(
    q: &str,
    table: &TableSchema,
    order_by: Option<&str>,
    grouped: bool,
) -> Vec<String> {
    let mut text = q.to_string();
    if let Some(col) = order_by {
        text = text.replace(&format!("order by {col}"), " ");
        text = text.replace(&format!("by {col}"), " ");
    }
    if grouped {
        text = text.replace(GROUP_PHRASE, " ");
    }

    table
        .column_names()
        .filter(|col| text.contains(col))
        .map(str::to_string)
        .collect()
}

/// Whether any count phrase occurs in the question
pub fn is_count_query<S: AsRef<str>>(q: &str, count_phrases: &[S]) -> bool {
    count_phrases
        .iter()
        .any(|phrase| q.contains(&phrase.as_ref().to_lowercase()))
}

pub fn is_group_by_city(q: &str) -> bool {
    q.contains(GROUP_PHRASE)
}

/// First known city mentioned in the question, in configured casing
pub fn extract_city<S: AsRef<str>>(q: &str, cities: &[S]) -> Option<String> {
    cities
        .iter()
        .map(AsRef::as_ref)
        .find(|city| q.contains(&city.to_lowercase()))
        .map(str::to_string)
}

/// Sort column named by `order by <col>` or `by <col>`.
///
/// Columns are tried in schema order; the first match wins. In a grouped
/// count the bare `by city` belongs to the grouping, so only an explicit
/// `order by city` sorts.
pub fn extract_order_by(q: &str, table: &TableSchema, grouped: bool) -> Option<String> {
    table
        .column_names()
        .find(|col| {
            if q.contains(&format!("order by {col}")) {
                return true;
            }
            if grouped && *col == GROUP_COLUMN {
                return false;
            }
            q.contains(&format!("by {col}"))
        })
        .map(str::to_string)
}

static LIMIT_RE: OnceLock<Regex> = OnceLock::new();

fn limit_regex() -> &'static Regex {
    LIMIT_RE.get_or_init(|| Regex::new(r"(top|first)\s+(\d+)").expect("valid regex literal"))
}

/// Row limit from `top N` / `first N`. N too large for u64 saturates.
pub fn extract_limit(q: &str) -> Option<u64> {
    limit_regex()
        .captures(q)
        .and_then(|caps| caps.get(2))
        .map(|n| n.as_str().parse().unwrap_or(u64::MAX))
}

#[cfg(test)]
#[path = "intent_test.rs"]
mod tests;
