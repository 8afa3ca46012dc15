//! Schema validation of SELECT statements
//!
//! This is the second, independent gate in front of execution. It never
//! trusts the synthesizer: tables and columns are re-derived from the SQL
//! text with a real lexer/parser and checked against the schema snapshot.
//! Statements may reference several (joined) tables; a column is accepted
//! if it belongs to at least one of them.

use crate::extractor::{extract_table_aliases, extract_tables};
use crate::parser::SqlParser;
use aq_core::Schema;
use serde::Serialize;
use sqlparser::ast::{Expr, SelectItem, SelectItemQualifiedWildcardKind, SetExpr, Statement};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Substrings that mark a select item as an aggregate, exempting it from
/// the column existence check
const AGGREGATE_MARKERS: [&str; 3] = ["count", "sum", "avg"];

/// Why a statement failed validation.
///
/// `Display` renders the reason string returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Statement does not start with SELECT
    NotSelect,
    /// Text starts with SELECT but does not parse
    Parse { message: String },
    /// More than one statement in the text
    MultipleStatements,
    /// UNION / INTERSECT / EXCEPT and similar bodies
    CompoundQuery,
    /// No FROM or JOIN relation found
    NoTable,
    /// A referenced table is not in the schema
    InvalidTable { table: String },
    /// A select item does not resolve to a column of a referenced table
    InvalidColumn { column: String },
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFailure::NotSelect => write!(f, "Only SELECT queries are allowed"),
            ValidationFailure::Parse { message } => write!(f, "SQL parse error: {message}"),
            ValidationFailure::MultipleStatements => {
                write!(f, "Only a single SELECT statement is allowed")
            }
            ValidationFailure::CompoundQuery => {
                write!(f, "Compound SELECT queries are not supported")
            }
            ValidationFailure::NoTable => write!(f, "No table detected in SQL"),
            ValidationFailure::InvalidTable { table } => {
                write!(f, "Table '{table}' does not exist in schema")
            }
            ValidationFailure::InvalidColumn { column } => {
                write!(f, "Column '{column}' does not exist in referenced tables")
            }
        }
    }
}

/// Outcome of [`validate`]. Returned, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid {
        /// Referenced tables, deduplicated
        tables: BTreeSet<String>,
        /// Select items as written, in order
        columns: Vec<String>,
    },
    Invalid(ValidationFailure),
}

impl ValidationResult {
    /// Whether the statement passed
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }

    /// Reason string for an invalid result
    pub fn reason(&self) -> Option<String> {
        match self {
            ValidationResult::Valid { .. } => None,
            ValidationResult::Invalid(failure) => Some(failure.to_string()),
        }
    }

    /// Convert into a `Result` for `?`-style branching
    pub fn into_result(self) -> Result<ValidatedQuery, ValidationFailure> {
        match self {
            ValidationResult::Valid { tables, columns } => Ok(ValidatedQuery { tables, columns }),
            ValidationResult::Invalid(failure) => Err(failure),
        }
    }
}

/// Tables and columns of a statement that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedQuery {
    pub tables: BTreeSet<String>,
    pub columns: Vec<String>,
}

/// Validate `sql` against a schema snapshot
pub fn validate(sql: &str, schema: &Schema) -> ValidationResult {
    match check(sql, schema) {
        Ok(ValidatedQuery { tables, columns }) => {
            log::debug!("SQL valid: tables={:?} columns={:?}", tables, columns);
            ValidationResult::Valid { tables, columns }
        }
        Err(failure) => {
            log::warn!("SQL rejected by validator: {failure}");
            ValidationResult::Invalid(failure)
        }
    }
}

fn check(sql: &str, schema: &Schema) -> Result<ValidatedQuery, ValidationFailure> {
    let sql = sql.trim();
    if !starts_with_select(sql) {
        return Err(ValidationFailure::NotSelect);
    }

    let statements = SqlParser::duckdb()
        .parse(sql)
        .map_err(|e| ValidationFailure::Parse {
            message: e.to_string(),
        })?;
    let [statement] = statements.as_slice() else {
        return Err(ValidationFailure::MultipleStatements);
    };
    let Statement::Query(query) = statement else {
        return Err(ValidationFailure::NotSelect);
    };
    let SetExpr::Select(select) = query.body.as_ref() else {
        return Err(ValidationFailure::CompoundQuery);
    };

    let tables = extract_tables(std::slice::from_ref(statement));
    if tables.is_empty() {
        return Err(ValidationFailure::NoTable);
    }
    if let Some(missing) = tables.iter().find(|t| !schema.contains_table(t)) {
        return Err(ValidationFailure::InvalidTable {
            table: missing.clone(),
        });
    }

    let scope = Scope {
        schema,
        tables: &tables,
        aliases: extract_table_aliases(select),
    };

    let mut columns = Vec::with_capacity(select.projection.len());
    for item in &select.projection {
        let token = item.to_string();
        if !is_aggregate_exempt(&token) && !scope.resolves(item) {
            return Err(ValidationFailure::InvalidColumn { column: token });
        }
        columns.push(token);
    }

    Ok(ValidatedQuery { tables, columns })
}

fn starts_with_select(sql: &str) -> bool {
    sql.get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("select"))
}

/// `*`, or anything mentioning count/sum/avg.
///
/// Deliberately shallow: a plain column named `discount` is exempt too.
fn is_aggregate_exempt(token: &str) -> bool {
    if token == "*" {
        return true;
    }
    let lower = token.to_lowercase();
    AGGREGATE_MARKERS.iter().any(|m| lower.contains(m))
}

/// Tables visible to the select list of one statement
struct Scope<'a> {
    schema: &'a Schema,
    tables: &'a BTreeSet<String>,
    aliases: HashMap<String, String>,
}

impl Scope<'_> {
    fn resolves(&self, item: &SelectItem) -> bool {
        match item {
            SelectItem::Wildcard(_) => true,
            SelectItem::UnnamedExpr(expr) | SelectItem::ExprWithAlias { expr, .. } => {
                self.resolves_expr(expr)
            }
            SelectItem::QualifiedWildcard(SelectItemQualifiedWildcardKind::ObjectName(name), _) => {
                name.0
                    .last()
                    .and_then(|part| part.as_ident())
                    .is_some_and(|ident| self.qualifier_table(&ident.value).is_some())
            }
            _ => false,
        }
    }

    fn resolves_expr(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Identifier(ident) => self.tables.iter().any(|t| self.has_column(t, &ident.value)),
            Expr::CompoundIdentifier(idents) if idents.len() >= 2 => {
                let column = &idents[idents.len() - 1].value;
                let qualifier = &idents[idents.len() - 2].value;
                self.qualifier_table(qualifier)
                    .is_some_and(|table| self.has_column(table, column))
            }
            _ => false,
        }
    }

    /// Resolve an alias or table name to a referenced table
    fn qualifier_table(&self, qualifier: &str) -> Option<&str> {
        if let Some(table) = self.aliases.get(qualifier) {
            return Some(table.as_str());
        }
        self.tables.get(qualifier).map(String::as_str)
    }

    fn has_column(&self, table: &str, column: &str) -> bool {
        self.schema
            .get(table)
            .is_some_and(|t| t.has_column(column))
    }
}

#[cfg(test)]
#[path = "validator_test.rs"]
mod tests;
