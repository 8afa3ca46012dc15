//! Schema command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, OutputFormat, SchemaArgs};
use crate::commands::common::connect;

/// Execute the schema command
pub(crate) async fn execute(args: &SchemaArgs, global: &GlobalArgs) -> Result<()> {
    let (_, db) = connect(global)?;
    let schema = db.fetch_schema().await.context("Failed to read schema")?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&schema)?),
        OutputFormat::Table if schema.is_empty() => println!("No tables found"),
        OutputFormat::Table => println!("{}", schema.to_text()),
    }
    Ok(())
}
