//! HTTP server command
//!
//! Runs the orderdesk HTTP server against Postgres, or against the in-memory
//! store when no database URL is configured.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use orderdesk_server::db::{schema, PoolSettings, DEFAULT_MAX_CONNECTIONS};
use orderdesk_server::http::{run_server, ServerConfig};
use orderdesk_server::{MemorySessionProvider, PgSessionProvider, SessionProvider};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "ORDERDESK_BIND", default_value = "0.0.0.0:5050")]
    pub bind: SocketAddr,

    /// Database URL; without one the server keeps data in memory
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "ORDERDESK_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Seconds a request waits for a free database connection
    #[arg(long, env = "ORDERDESK_ACQUIRE_TIMEOUT_SECS", default_value_t = 10)]
    pub acquire_timeout_secs: u64,

    /// Create missing tables before serving
    #[arg(long)]
    pub init_schema: bool,

    /// Seconds the /sleep endpoints wait
    #[arg(long, env = "ORDERDESK_SLEEP_SECS", default_value_t = 5)]
    pub sleep_secs: u64,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let sessions: Arc<dyn SessionProvider> = match args.database_url.as_deref() {
        Some(database_url) => {
            let settings = PoolSettings {
                max_connections: args.max_connections,
                acquire_timeout: Duration::from_secs(args.acquire_timeout_secs),
            };
            let provider = PgSessionProvider::connect(database_url, &settings)
                .await
                .context("Failed to create database pool")?;
            if args.init_schema {
                schema::ensure(provider.pool())
                    .await
                    .context("Failed to create tables")?;
            }
            Arc::new(provider)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, data is kept in memory and lost on exit");
            Arc::new(MemorySessionProvider::new())
        }
    };

    let config = ServerConfig {
        bind_addr: args.bind,
        sleep_interval: Duration::from_secs(args.sleep_secs),
    };

    tracing::info!("Starting orderdesk server on {}", args.bind);

    // Run server (blocks until shutdown)
    run_server(sessions, config).await.context("Server error")?;

    Ok(())
}
