//! Ask command implementation

use anyhow::Result;

use crate::cli::{AskArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{self, build_translator, cell_text, connect, ExitCode};
use crate::pipeline::{self, AskResponse};

/// Execute the ask command
pub(crate) async fn execute(args: &AskArgs, global: &GlobalArgs) -> Result<()> {
    let (config, db) = connect(global)?;
    let translator = build_translator(&config)?;

    let outcome = pipeline::ask(db.as_ref(), &translator, &args.question).await;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome.response)?),
        OutputFormat::Table => print_response(&outcome.response),
    }

    if !outcome.is_success() {
        return Err(ExitCode(1).into());
    }
    Ok(())
}

fn print_response(response: &AskResponse) {
    match response {
        AskResponse::Success {
            sql,
            tables_used,
            data,
            ..
        } => {
            println!("SQL: {}", sql);
            println!("Tables: {}\n", tables_used.join(", "));
            let Some(first) = data.first() else {
                println!("(no rows)");
                return;
            };
            let headers: Vec<&str> = first.keys().map(String::as_str).collect();
            let rows: Vec<Vec<String>> = data
                .iter()
                .map(|row| row.values().map(cell_text).collect())
                .collect();
            common::print_table(&headers, &rows);
            println!("\n{} row(s)", data.len());
        }
        AskResponse::Failure { error, reason, sql } => {
            eprintln!("{}: {}", error, reason);
            if let Some(sql) = sql {
                eprintln!("SQL: {}", sql);
            }
        }
    }
}
