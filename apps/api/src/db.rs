use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates a PostgreSQL connection pool without requiring the server to be up.
///
/// Only an unparseable URL is an error here. A request made while the server
/// is down fails after the acquire timeout instead of hanging.
pub fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Configuring PostgreSQL pool...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(database_url)
        .context("DATABASE_URL is not a valid PostgreSQL connection string")?;

    Ok(pool)
}

/// Pings the store and applies pending migrations.
pub async fn prepare_schema(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .context("PostgreSQL is unreachable")?;
    info!("PostgreSQL connection established");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to apply migrations")?;
    info!("Migrations applied");
    Ok(())
}
