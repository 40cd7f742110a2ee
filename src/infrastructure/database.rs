// Persistence accessor
// One pool per process, created at start-up and closed on shutdown

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::domain::errors::DomainError;

/// Opens the shared connection pool and brings the schema up to date
///
/// The returned pool is cheap to clone; every repository holds a handle to
/// the same underlying pool. Call `pool.close().await` on shutdown.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!(
        max_connections = config.max_connections,
        "Connecting to database..."
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database connected and migrated");
    Ok(pool)
}

impl From<sqlx::Error> for DomainError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if db_error.is_unique_violation() {
                return DomainError::Conflict(format!("Duplicate entry: {}", db_error.message()));
            }
        }
        DomainError::Persistence(error.to_string())
    }
}
