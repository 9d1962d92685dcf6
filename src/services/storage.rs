//! Storage pool construction.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;

/// Open the connection pool and verify connectivity.
///
/// The probe query makes a bad URL or unreachable file fail at container
/// construction instead of on the first request.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    ping(&pool).await?;

    Ok(pool)
}

/// Cheap connectivity probe.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
