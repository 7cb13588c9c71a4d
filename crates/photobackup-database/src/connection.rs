//! SQLite connection pool management.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use photobackup_core::config::DatabaseConfig;
use photobackup_core::error::{AppError, ErrorKind};

use crate::invalidation::InvalidationTracker;

/// Wrapper around the sqlx SQLite connection pool and the change tracker
/// shared by every repository built on it.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    /// The underlying sqlx connection pool.
    pool: SqlitePool,
    /// Table change notifications.
    tracker: Arc<InvalidationTracker>,
}

impl DatabasePool {
    /// Create a new database pool from configuration.
    ///
    /// The database file is created if it does not exist.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Connecting to SQLite"
        );

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Invalid database URL '{}'", config.url),
                    e,
                )
            })?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        info!("Successfully connected to SQLite");
        Ok(Self::from_pool(pool))
    }

    /// Open a private in-memory database.
    ///
    /// The pool holds exactly one connection that never expires, since an
    /// in-memory database lives only as long as its connection.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Invalid URL", e))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to open in-memory database", e)
            })?;

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool with a fresh change tracker.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            tracker: Arc::new(InvalidationTracker::new()),
        }
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Return the change tracker.
    pub fn tracker(&self) -> Arc<InvalidationTracker> {
        Arc::clone(&self.tracker)
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_health_check() {
        let db = DatabasePool::in_memory().await.unwrap();
        assert!(db.health_check().await.unwrap());
        db.close().await;
    }
}
