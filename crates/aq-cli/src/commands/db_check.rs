//! Database connectivity check

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::commands::common::{create_database_connection, load_config, ExitCode};

/// Execute the db-check command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let result = match create_database_connection(&config, global.target.as_deref()) {
        Ok(db) => db.ping().await.map(|_| db.db_type()).map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(db_type) => {
            println!("Database connected ({})", db_type);
            Ok(())
        }
        Err(e) => {
            eprintln!("Database connection failed: {:#}", e);
            Err(ExitCode(1).into())
        }
    }
}
