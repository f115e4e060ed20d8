use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from pool setup
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Build the process-wide pool. Connections are opened on first use, so a
/// database outage at startup does not keep the server from binding.
pub fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    if url::Url::parse(&config.url).is_err() {
        return Err(DatabaseError::InvalidDatabaseUrl);
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect_lazy(&config.url)?;

    info!(
        database = %config.redacted_url(),
        max_connections = config.max_connections,
        "Created database pool"
    );
    Ok(pool)
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Close the pool on shutdown, waiting for checked-out connections to return
pub async fn close(pool: &PgPool) {
    pool.close().await;
    info!("Closed database pool");
}
