//! User Accounts API
//!
//! User directory and credential management:
//! - Sanitized user listing, lookup and deletion
//! - Account creation, profile update and password rotation with Argon2
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use config::StorageBackend;
use infrastructure::user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository};

/// Create the application state with default configuration (in-memory store)
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher = Arc::new(Argon2Hasher::with_config(&config.hashing)?);

    info!("Storage backend: {:?}", config.storage.backend);

    let state = match config.storage.backend {
        StorageBackend::Memory => {
            AppState::new(Arc::new(InMemoryUserRepository::new()), hasher)
        }
        StorageBackend::Postgres => {
            let repository = connect_postgres(config).await?;
            repository.ensure_schema().await?;
            AppState::new(Arc::new(repository), hasher)
        }
    };

    Ok(state)
}

/// Connect to the configured PostgreSQL database
pub async fn connect_postgres(config: &AppConfig) -> anyhow::Result<PostgresUserRepository> {
    let database_url = config.storage.database_url().ok_or_else(|| {
        anyhow::anyhow!("storage.database_url or DATABASE_URL is required for the postgres backend")
    })?;

    let repository =
        PostgresUserRepository::connect(&database_url, config.storage.max_connections).await?;
    info!("PostgreSQL connection established");

    Ok(repository)
}
