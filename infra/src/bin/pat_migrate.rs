//! Apply the token store schema to the configured database.

use anyhow::Context;
use pat_infra::database::DatabasePool;
use pat_infra::telemetry::init_tracing;
use pat_shared::{AppConfig, Environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment-specific file first, then the plain .env
    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging).context("failed to initialize tracing")?;

    tracing::info!(environment = %config.environment, "Starting token store migration");

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("failed to connect to the database")?;

    let outcome = migrate(&pool).await;
    pool.close().await;
    outcome
}

async fn migrate(pool: &DatabasePool) -> anyhow::Result<()> {
    pool.run_migrations()
        .await
        .context("failed to apply migrations")?;

    if !pool.health_check().await.context("health check failed")? {
        anyhow::bail!("database health check returned an unexpected value");
    }

    tracing::info!(stats = %pool.get_statistics(), "Token store schema is up to date");
    Ok(())
}
