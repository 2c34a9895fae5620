//! Migrate command - creates the PostgreSQL schema

use tracing::info;

/// Create the users table and exit
pub async fn run() -> anyhow::Result<()> {
    let config = super::load_config_and_init_logging();

    let repository = crate::connect_postgres(&config).await?;
    repository.ensure_schema().await?;

    info!("Users table is ready");

    Ok(())
}
