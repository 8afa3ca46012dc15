//! Integration tests for askql
//!
//! Library-level tests drive translation, validation, and execution against
//! an in-memory DuckDB seeded from the fixture config. CLI tests run the
//! compiled `aq` binary against the same fixture.

use aq_core::Config;
use aq_db::{Database, DuckDbBackend, SchemaProvider, SqlExecutor};
use aq_sql::{validate, ValidationResult};
use aq_translate::{translate, RelationshipResolver, TranslateError};
use serde_json::{json, Value};
use std::path::Path;
use std::process::Command;

const FIXTURE_CONFIG: &str = "tests/fixtures/askql.yml";

/// Path to the compiled aq binary
fn aq_bin() -> String {
    env!("CARGO_BIN_EXE_aq").to_string()
}

/// Run an `aq` CLI command against the fixture config and return
/// (stdout, stderr, success).
fn run_aq(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(aq_bin())
        .arg("--config")
        .arg(FIXTURE_CONFIG)
        .args(args)
        .env_remove("ASKQL_TARGET")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute aq with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn fixture() -> (Config, DuckDbBackend) {
    let config = Config::load(Path::new(FIXTURE_CONFIG)).unwrap();
    let db = DuckDbBackend::from_config(&config.database).unwrap();
    (config, db)
}

// ── Library pipeline ────────────────────────────────────────────────────

#[test]
fn test_fixture_config_loads() {
    let config = Config::load(Path::new(FIXTURE_CONFIG)).unwrap();
    assert_eq!(config.server.port, 8765);
    assert_eq!(config.vocabulary.typos.get("studnets").map(String::as_str), Some("students"));
    assert_eq!(config.available_targets(), vec!["empty"]);
}

#[tokio::test]
async fn test_translate_validate_execute() {
    let (config, db) = fixture();
    let schema = db.fetch_schema().await.unwrap();
    assert_eq!(schema.len(), 3);

    let generated = translate("How mny studnets by city", &schema, &config.vocabulary).unwrap();
    assert_eq!(
        generated.sql,
        "SELECT city, COUNT(*) AS count FROM students GROUP BY city;"
    );

    let ValidationResult::Valid { tables, .. } = validate(&generated.sql, &schema) else {
        panic!("generated SQL should validate");
    };
    assert!(tables.contains("students"));

    let rows = db
        .execute_query(&generated.sql, &generated.params)
        .await
        .unwrap();
    let bangalore = rows
        .iter()
        .find(|r| r["city"] == json!("Bangalore"))
        .unwrap();
    assert_eq!(bangalore["count"], json!(2));
}

#[tokio::test]
async fn test_bound_filter_executes() {
    let (config, db) = fixture();
    let schema = db.fetch_schema().await.unwrap();

    let generated = translate(
        "students in bangalore order by name",
        &schema,
        &config.vocabulary,
    )
    .unwrap();
    assert_eq!(
        generated.display_sql,
        "SELECT * FROM students WHERE city = 'Bangalore' ORDER BY name ASC;"
    );
    assert!(validate(&generated.sql, &schema).is_valid());

    let rows = db
        .execute_query(&generated.sql, &generated.params)
        .await
        .unwrap();
    let names: Vec<&Value> = rows.iter().map(|r| &r["name"]).collect();
    assert_eq!(names, vec![&json!("Asha"), &json!("Meera")]);
}

#[tokio::test]
async fn test_no_table_detected_in_multi_table_schema() {
    let (config, db) = fixture();
    let schema = db.fetch_schema().await.unwrap();
    let err = translate("what is the weather", &schema, &config.vocabulary).unwrap_err();
    assert!(matches!(err, TranslateError::NoTableDetected));
}

#[tokio::test]
async fn test_validator_against_live_schema() {
    let (_, db) = fixture();
    let schema = db.fetch_schema().await.unwrap();

    assert_eq!(
        validate("DELETE FROM students", &schema).reason().as_deref(),
        Some("Only SELECT queries are allowed")
    );
    assert_eq!(
        validate("SELECT ghost FROM students", &schema).reason().as_deref(),
        Some("Column 'ghost' does not exist in referenced tables")
    );

    let join = "SELECT students.name, courses.course_name FROM students \
                JOIN enrollments ON enrollments.student_id = students.id \
                JOIN courses ON enrollments.course_id = courses.id";
    assert!(validate(join, &schema).is_valid());
    let rows = db.execute_query(join, &[]).await.unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_join_template_executes() {
    let (config, db) = fixture();
    let resolver = RelationshipResolver::new(config.relationships.clone());
    let required = resolver.required_tables("which students enrolled in which course");
    let from = resolver.resolve(&required).unwrap();

    let sql = format!("SELECT students.name, courses.course_name FROM {from}");
    assert!(validate(&sql, &db.fetch_schema().await.unwrap()).is_valid());
    assert_eq!(db.execute_query(&sql, &[]).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_ping() {
    let (_, db) = fixture();
    db.ping().await.unwrap();
}

// ── CLI ─────────────────────────────────────────────────────────────────

#[test]
fn test_cli_ask_json() {
    let (stdout, stderr, success) = run_aq(&["ask", "how many students by city", "-o", "json"]);
    assert!(success, "stderr: {}", stderr);
    let body: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        body["sql"],
        json!("SELECT city, COUNT(*) AS count FROM students GROUP BY city;")
    );
    assert_eq!(body["tables_used"], json!(["students"]));
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[test]
fn test_cli_ask_table() {
    let (stdout, _, success) = run_aq(&["ask", "top 2 students order by name"]);
    assert!(success);
    assert!(stdout.contains("SQL: SELECT * FROM students ORDER BY name ASC LIMIT 2;"));
    assert!(stdout.contains("Asha"));
    assert!(stdout.contains("2 row(s)"));
}

#[test]
fn test_cli_ask_untranslatable_fails() {
    let (stdout, _, success) = run_aq(&["ask", "what is the weather", "--output", "json"]);
    assert!(!success);
    let body: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(body["reason"], json!("[T001] No valid table mentioned in question"));
    assert_eq!(body["sql"], Value::Null);
}

#[test]
fn test_cli_translate() {
    let (stdout, _, success) = run_aq(&["translate", "students in delhi"]);
    assert!(success);
    assert!(stdout.contains("SELECT * FROM students WHERE city = 'Delhi';"));
    assert!(stdout.contains("SELECT * FROM students WHERE city = ?;"));
}

#[test]
fn test_cli_validate() {
    let (stdout, _, success) = run_aq(&["validate", "SELECT name FROM students"]);
    assert!(success);
    assert!(stdout.contains("Valid"));

    let (_, stderr, success) = run_aq(&["validate", "DROP TABLE students"]);
    assert!(!success);
    assert!(stderr.contains("Only SELECT queries are allowed"));
}

#[test]
fn test_cli_validate_json() {
    let (stdout, _, success) = run_aq(&["validate", "SELECT name FROM students", "-o", "json"]);
    assert!(success);
    let body: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(body["tables"], json!(["students"]));
    assert_eq!(body["columns"], json!(["name"]));

    let (stdout, _, success) = run_aq(&["validate", "SELECT ghost FROM students", "--output", "json"]);
    assert!(!success);
    let body: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        body["reason"],
        json!("Column 'ghost' does not exist in referenced tables")
    );
}

#[test]
fn test_cli_schema() {
    let (stdout, _, success) = run_aq(&["schema"]);
    assert!(success);
    assert!(stdout.contains("Table students has columns: id, name, city"));
    assert!(stdout.contains("Table courses has columns: id, course_name"));
}

#[test]
fn test_cli_joins() {
    let (stdout, _, success) = run_aq(&["joins", "students enrolled in courses"]);
    assert!(success);
    assert!(stdout.contains("Tables: courses, enrollments, students"));
    assert!(stdout.contains("FROM enrollments JOIN courses ON enrollments.course_id = courses.id"));

    let (_, _, success) = run_aq(&["joins", "students and courses"]);
    assert!(!success);
}

#[test]
fn test_cli_db_check() {
    let (stdout, _, success) = run_aq(&["db-check"]);
    assert!(success);
    assert!(stdout.contains("Database connected (duckdb)"));
}

#[test]
fn test_cli_target_override() {
    let (stdout, _, success) = run_aq(&["--target", "empty", "schema"]);
    assert!(success);
    assert!(stdout.contains("No tables found"));
}

#[test]
fn test_cli_unknown_target_fails() {
    let (_, stderr, success) = run_aq(&["--target", "nope", "schema"]);
    assert!(!success);
    assert!(stderr.contains("Error"));
}
