//! Table reference extraction from SQL AST

use sqlparser::ast::{visit_relations, ObjectName, Select, Statement, TableFactor, TableWithJoins};
use std::collections::{BTreeSet, HashMap};

/// Extract every table referenced by the statements.
///
/// Uses `visit_relations` to walk FROM clauses, JOINs and subqueries.
/// Schema-qualified references (`main.students`) are reduced to their
/// table part, which is what a schema snapshot is keyed by.
pub fn extract_tables(statements: &[Statement]) -> BTreeSet<String> {
    let mut tables = BTreeSet::new();

    for stmt in statements {
        let _ = visit_relations(stmt, |relation| {
            if let Some(name) = table_part(relation) {
                tables.insert(name);
            }
            std::ops::ControlFlow::<()>::Continue(())
        });
    }

    tables
}

/// Map of alias → table for the FROM/JOIN items of a single SELECT
pub fn extract_table_aliases(select: &Select) -> HashMap<String, String> {
    let mut aliases = HashMap::new();
    for table in &select.from {
        collect_aliases(table, &mut aliases);
    }
    aliases
}

fn collect_aliases(table: &TableWithJoins, aliases: &mut HashMap<String, String>) {
    collect_factor_alias(&table.relation, aliases);
    for join in &table.joins {
        collect_factor_alias(&join.relation, aliases);
    }
}

fn collect_factor_alias(factor: &TableFactor, aliases: &mut HashMap<String, String>) {
    match factor {
        TableFactor::Table {
            name,
            alias: Some(alias),
            ..
        } => {
            if let Some(table) = table_part(name) {
                aliases.insert(alias.name.value.clone(), table);
            }
        }
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => collect_aliases(table_with_joins, aliases),
        _ => {}
    }
}

/// Last identifier of an object name
fn table_part(name: &ObjectName) -> Option<String> {
    name.0
        .last()
        .and_then(|part| part.as_ident())
        .map(|ident| ident.value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SqlParser;
    use sqlparser::ast::SetExpr;

    fn parse_and_extract(sql: &str) -> BTreeSet<String> {
        let parser = SqlParser::duckdb();
        let stmts = parser.parse(sql).unwrap();
        extract_tables(&stmts)
    }

    fn aliases_of(sql: &str) -> HashMap<String, String> {
        let stmts = SqlParser::duckdb().parse(sql).unwrap();
        let Statement::Query(query) = &stmts[0] else {
            panic!("not a query");
        };
        let SetExpr::Select(select) = query.body.as_ref() else {
            panic!("not a select");
        };
        extract_table_aliases(select)
    }

    #[test]
    fn test_extract_from_simple_select() {
        let tables = parse_and_extract("SELECT * FROM students");
        assert_eq!(tables, BTreeSet::from(["students".to_string()]));
    }

    #[test]
    fn test_extract_from_join() {
        let tables = parse_and_extract(
            "SELECT * FROM students s JOIN enrollments e ON e.student_id = s.id",
        );
        assert!(tables.contains("students"));
        assert!(tables.contains("enrollments"));
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn test_extract_deduplicates() {
        let tables = parse_and_extract("SELECT * FROM students a JOIN students b ON a.id = b.id");
        assert_eq!(tables.len(), 1);
    }

    #[test]
    fn test_extract_from_subquery() {
        let tables = parse_and_extract(
            "SELECT name FROM students WHERE id IN (SELECT student_id FROM enrollments)",
        );
        assert!(tables.contains("enrollments"));
        assert!(tables.contains("students"));
    }

    #[test]
    fn test_extract_schema_qualified_keeps_table_part() {
        let tables = parse_and_extract("SELECT * FROM main.students");
        assert_eq!(tables, BTreeSet::from(["students".to_string()]));
    }

    #[test]
    fn test_extract_no_tables() {
        assert!(parse_and_extract("SELECT 1").is_empty());
    }

    #[test]
    fn test_aliases_from_joins() {
        let aliases = aliases_of(
            "SELECT s.name FROM students AS s LEFT JOIN enrollments e ON e.student_id = s.id",
        );
        assert_eq!(aliases.get("s").map(String::as_str), Some("students"));
        assert_eq!(aliases.get("e").map(String::as_str), Some("enrollments"));
    }

    #[test]
    fn test_no_aliases() {
        assert!(aliases_of("SELECT name FROM students").is_empty());
    }
}
