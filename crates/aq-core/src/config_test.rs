use super::*;
use std::io::Write;

#[test]
fn test_parse_empty_config_uses_defaults() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.database.schema, "main");
    assert_eq!(
        config.vocabulary.cities,
        vec!["Bangalore", "Delhi", "Chennai"]
    );
    assert_eq!(config.vocabulary.count_phrases.len(), 5);
    assert_eq!(config.vocabulary.typos.get("mny").unwrap(), "many");
    assert_eq!(config.relationships, RelationshipMap::enrollment_defaults());
    assert_eq!(config.server.port, 8000);
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
database:
  path: "./school.duckdb"
  schema: public
  on_start:
    - "CREATE TABLE IF NOT EXISTS students (id INTEGER, name VARCHAR, city VARCHAR)"
vocabulary:
  cities: [Mumbai, Pune]
  count_phrases: [count, how many]
  typos:
    studnets: students
relationships:
  orders:
    customers:
      local_key: customer_id
      foreign_key: id
server:
  host: 0.0.0.0
  port: 9000
targets:
  prod:
    database:
      path: prod.duckdb
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.database.schema, "public");
    assert_eq!(config.database.on_start.len(), 1);
    assert_eq!(config.vocabulary.cities, vec!["Mumbai", "Pune"]);
    assert_eq!(config.vocabulary.typos.len(), 1);
    assert!(config.relationships.peers("orders").is_some());
    assert!(config.relationships.peers("enrollments").is_none());
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.available_targets(), vec!["prod"]);
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("databse:\n  path: x.duckdb\n");
    assert!(result.is_err());
}

#[test]
fn test_get_database_config_with_target() {
    let yaml = r#"
database:
  path: dev.duckdb
targets:
  prod:
    database:
      path: prod.duckdb
  bare: {}
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.get_database_config(None).unwrap().path, "dev.duckdb");
    assert_eq!(
        config.get_database_config(Some("prod")).unwrap().path,
        "prod.duckdb"
    );
    assert_eq!(
        config.get_database_config(Some("bare")).unwrap().path,
        "dev.duckdb"
    );

    let err = config.get_database_config(Some("staging")).unwrap_err();
    assert!(err.to_string().contains("Available targets: bare, prod"));
}

#[test]
fn test_resolve_target_prefers_cli_flag() {
    assert_eq!(Config::resolve_target(Some("prod")).as_deref(), Some("prod"));
}

#[test]
fn test_load_missing_file() {
    let result = Config::load(Path::new("/nonexistent/askql.yml"));
    assert!(matches!(result, Err(CoreError::ConfigNotFound { .. })));
}

#[test]
fn test_load_from_dir_without_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.database.path, ":memory:");
}

#[test]
fn test_load_from_dir_reads_yaml_extension() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = std::fs::File::create(dir.path().join("askql.yaml")).unwrap();
    writeln!(file, "database:\n  path: data.duckdb").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.database.path, "data.duckdb");
}

#[test]
fn test_load_rejects_empty_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("askql.yml");
    std::fs::write(&path, "database:\n  schema: \"\"\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
    assert!(err.to_string().contains("database.schema"));
}

#[test]
fn test_load_rejects_empty_city() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("askql.yml");
    std::fs::write(&path, "vocabulary:\n  cities: [Delhi, \" \"]\n").unwrap();

    assert!(matches!(
        Config::load(&path),
        Err(CoreError::ConfigInvalid { .. })
    ));
}

#[test]
fn test_load_rejects_empty_target_database_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("askql.yml");
    std::fs::write(&path, "targets:\n  prod:\n    database:\n      path: \"\"\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("targets.prod.database.path"));
}

#[test]
fn test_load_reports_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("askql.yml");
    std::fs::write(&path, "server:\n  port: not-a-number\n").unwrap();

    assert!(matches!(
        Config::load(&path),
        Err(CoreError::ConfigParseError { .. })
    ));
}
