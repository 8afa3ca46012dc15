//! Validate command implementation

use anyhow::{Context, Result};
use serde_json::json;

use crate::cli::{GlobalArgs, OutputFormat, ValidateArgs};
use crate::commands::common::{connect, ExitCode};

/// Execute the validate command
pub(crate) async fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let (_, db) = connect(global)?;
    let schema = db.fetch_schema().await.context("Failed to read schema")?;

    match (aq_sql::validate(&args.sql, &schema).into_result(), args.output) {
        (Ok(validated), OutputFormat::Json) => {
            println!("{}", serde_json::to_string_pretty(&validated)?);
            Ok(())
        }
        (Ok(validated), OutputFormat::Table) => {
            println!("Valid");
            println!(
                "  Tables:  {}",
                validated.tables.into_iter().collect::<Vec<_>>().join(", ")
            );
            println!("  Columns: {}", validated.columns.join(", "));
            Ok(())
        }
        (Err(failure), OutputFormat::Json) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "reason": failure.to_string() }))?
            );
            Err(ExitCode(1).into())
        }
        (Err(failure), OutputFormat::Table) => {
            eprintln!("Invalid: {}", failure);
            Err(ExitCode(1).into())
        }
    }
}
