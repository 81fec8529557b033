//! Database bootstrap command

use anyhow::{Context, Result};
use clap::Parser;

use orderdesk_server::db::{schema, PoolSettings};
use orderdesk_server::PgSessionProvider;

/// Arguments for the init-db command
#[derive(Parser, Debug)]
pub struct InitDbArgs {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
}

/// Create the tables and exit
pub async fn run_init_db(args: InitDbArgs) -> Result<()> {
    let sessions = PgSessionProvider::connect(&args.database_url, &PoolSettings::default())
        .await
        .context("Failed to connect to database")?;

    schema::ensure(sessions.pool())
        .await
        .context("Failed to create tables")?;

    sessions.close().await;
    Ok(())
}
