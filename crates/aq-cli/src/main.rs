//! askql CLI - ask questions of a DuckDB database in plain English

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod pipeline;

use cli::Cli;
use commands::{ask, db_check, joins, schema, serve, translate, validate};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match run(&cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<commands::common::ExitCode>() {
            Some(code) => std::process::ExitCode::from(code.0),
            None => {
                eprintln!("Error: {:#}", err);
                std::process::ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        cli::Commands::Ask(args) => ask::execute(args, &cli.global).await,
        cli::Commands::Translate(args) => translate::execute(args, &cli.global).await,
        cli::Commands::Validate(args) => validate::execute(args, &cli.global).await,
        cli::Commands::Schema(args) => schema::execute(args, &cli.global).await,
        cli::Commands::Joins(args) => joins::execute(args, &cli.global).await,
        cli::Commands::DbCheck => db_check::execute(&cli.global).await,
        cli::Commands::Serve(args) => serve::execute(args, &cli.global).await,
    }
}

/// `warn` by default, `info` with --verbose; RUST_LOG wins when set
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}
