//! PostgreSQL pool and schema for the loan store

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::Config;

/// Users, loans and amortization schedules
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Cannot reach loan database at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Loan schema migration failed: {0}")]
    Migrate(#[from] MigrateError),

    #[error("Loan database did not answer: {0}")]
    Unreachable(#[source] sqlx::Error),
}

/// Pool sized by `DB_MAX_CONNECTIONS`; calculations hold a connection only
/// for the duration of one loan transaction.
pub async fn create_pool(config: &Config) -> Result<PgPool, DbError> {
    let url = config.database_url_masked();

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .connect(&config.database_url)
        .await
        .map_err(|source| DbError::Connect {
            url: url.clone(),
            source,
        })?;

    tracing::info!(
        database = %url,
        max_connections = config.db_max_connections,
        "Loan database pool ready"
    );

    Ok(pool)
}

/// Bring the users/loans/amortization_schedules schema up to date
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    MIGRATOR.run(pool).await?;

    tracing::info!(migrations = MIGRATOR.iter().count(), "Loan schema up to date");

    Ok(())
}

/// Round trip used by `/health`
pub async fn check_health(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(DbError::Unreachable)?;

    Ok(())
}
