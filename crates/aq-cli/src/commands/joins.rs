//! Joins command implementation

use anyhow::Result;
use aq_translate::RelationshipResolver;

use crate::cli::{GlobalArgs, JoinsArgs};
use crate::commands::common::{load_config, ExitCode};

/// Execute the joins command
pub(crate) async fn execute(args: &JoinsArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let resolver = RelationshipResolver::new(config.relationships.clone());

    let required = resolver.required_tables(&args.question);
    if required.is_empty() {
        eprintln!("No known tables mentioned");
        return Err(ExitCode(1).into());
    }
    println!(
        "Tables: {}",
        required.iter().cloned().collect::<Vec<_>>().join(", ")
    );

    match resolver.resolve(&required) {
        Some(from) => {
            println!("FROM {}", from);
            Ok(())
        }
        None => {
            eprintln!("No join template covers these tables");
            Err(ExitCode(1).into())
        }
    }
}
