//! Translate command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, OutputFormat, TranslateArgs};
use crate::commands::common::{build_translator, connect};

/// Execute the translate command
pub(crate) async fn execute(args: &TranslateArgs, global: &GlobalArgs) -> Result<()> {
    let (config, db) = connect(global)?;
    let translator = build_translator(&config)?;
    let schema = db.fetch_schema().await.context("Failed to read schema")?;

    let translation = translator
        .translate(&args.question, &schema)
        .context("Translation failed")?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&translation)?),
        OutputFormat::Table => {
            println!("Question: {}", translation.question);
            println!("SQL:      {}", translation.sql.display_sql);
            if !translation.sql.params.is_empty() {
                println!("Bound:    {}", translation.sql.sql);
                println!("Params:   {:?}", translation.sql.params);
            }
        }
    }
    Ok(())
}
