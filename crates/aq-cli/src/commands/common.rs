//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use aq_core::Config;
use aq_db::{Database, DuckDbBackend};
use aq_translate::Translator;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; the command has already reported the failure.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load askql.yml from `--config`, or search the project directory.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path)),
        None => Config::load_from_dir(Path::new(&global.project_dir))
            .context("Failed to load config"),
    }
}

/// Open the database for the resolved target
pub(crate) fn create_database_connection(
    config: &Config,
    target: Option<&str>,
) -> Result<Arc<dyn Database>> {
    let resolved_target = Config::resolve_target(target);
    let db_config = config
        .get_database_config(resolved_target.as_deref())
        .context("Failed to get database configuration")?;
    let db: Arc<dyn Database> = Arc::new(
        DuckDbBackend::from_config(&db_config).context("Failed to connect to database")?,
    );
    Ok(db)
}

/// Config plus an open database, the setup every data command needs
pub(crate) fn connect(global: &GlobalArgs) -> Result<(Config, Arc<dyn Database>)> {
    let config = load_config(global)?;
    let db = create_database_connection(&config, global.target.as_deref())?;
    Ok((config, db))
}

/// Translator prepared from the configured vocabulary
pub(crate) fn build_translator(config: &Config) -> Result<Translator> {
    Translator::new(config.vocabulary.clone()).context("Invalid vocabulary configuration")
}

/// Render a JSON cell for table output
pub(crate) fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Calculate column widths for table output
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Print a formatted table to stdout.
///
/// Columns are left-aligned and separated by two spaces, with a dashed
/// separator under the header row.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  "));

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  "));
    }
}
