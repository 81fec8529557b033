//! Tracing setup for the orderdesk CLI
//!
//! Usage:
//!   orderdesk --debug serve             # Debug logging to console
//!   orderdesk --sql-echo serve          # Also log every SQL statement
//!   RUST_LOG=orderdesk_server=debug ... # Fine-grained log control
//!
//! Request handling runs inside a `request{request_id=..}` span, so every
//! line logged while serving a request carries its id.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets debug level if RUST_LOG is not set)
    pub debug: bool,
    /// Log SQL statements (sqlx emits them at debug level)
    pub sql_echo: bool,
}

/// Build the filter from `RUST_LOG` and the CLI flags.
pub fn build_filter(config: &TracingConfig) -> Result<EnvFilter> {
    filter_from(config, std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
}

/// `rust_log` wins when it parses; the sqlx default only applies without it.
/// `--sql-echo` is an explicit request and is added either way.
fn filter_from(config: &TracingConfig, rust_log: Option<&str>) -> Result<EnvFilter> {
    let from_env = rust_log.and_then(|directives| EnvFilter::try_new(directives).ok());
    let user_configured = from_env.is_some();

    let mut filter = from_env.unwrap_or_else(|| {
        let default_level = if config.debug { "debug" } else { "info" };
        EnvFilter::new(default_level)
    });

    if config.sql_echo {
        filter = filter.add_directive("sqlx::query=debug".parse()?);
    } else if !user_configured {
        filter = filter.add_directive("sqlx=warn".parse()?);
    }

    Ok(filter)
}

/// Initialize console tracing
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
