//! CLI module for the User Accounts API
//!
//! - `serve`: run the HTTP server (default)
//! - `migrate`: create the PostgreSQL schema and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

/// User Accounts API - user directory and credential management
#[derive(Parser)]
#[command(name = "user-accounts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Default, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default mode)
    #[default]
    Serve,

    /// Create the users table in PostgreSQL
    Migrate,
}

/// Load `.env` and configuration, then install logging.
///
/// A broken configuration source falls back to defaults with a warning.
pub(crate) fn load_config_and_init_logging() -> AppConfig {
    dotenvy::dotenv().ok();

    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&config.logging);

    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load configuration, using defaults");
    }

    config
}
