//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// askql - Ask questions of a database in plain English
#[derive(Parser, Debug)]
#[command(name = "aq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory searched for askql.yml
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override target (database connection)
    #[arg(short, long, global = true, env = "ASKQL_TARGET")]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate, validate, and execute a question
    Ask(AskArgs),

    /// Translate a question to SQL without executing it
    Translate(TranslateArgs),

    /// Validate a SQL statement against the live schema
    Validate(ValidateArgs),

    /// Print the database schema
    Schema(SchemaArgs),

    /// Show the tables a question needs and their join template
    Joins(JoinsArgs),

    /// Check database connectivity
    DbCheck,

    /// Serve the HTTP API
    Serve(ServeArgs),
}

/// Output formats for commands that print results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

/// Arguments for the ask command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question in plain English
    pub question: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the translate command
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Question in plain English
    pub question: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// SQL statement to validate
    pub sql: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the schema command
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the joins command
#[derive(Args, Debug)]
pub struct JoinsArgs {
    /// Question in plain English
    pub question: String,
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind (defaults to server.host from config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (defaults to server.port from config)
    #[arg(long)]
    pub port: Option<u16>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
