//! Backup error repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use photobackup_core::error::{AppError, ErrorKind};
use photobackup_core::observe::QueryObservable;
use photobackup_core::result::AppResult;
use photobackup_core::types::id::FolderId;
use photobackup_entity::error::BackupError;
use photobackup_entity::repository::BackupErrorRepository;

use crate::connection::DatabasePool;
use crate::invalidation::{InvalidationTracker, Table};

/// Repository for recorded backup errors.
#[derive(Debug, Clone)]
pub struct SqliteBackupErrorRepository {
    pool: SqlitePool,
    tracker: Arc<InvalidationTracker>,
}

impl SqliteBackupErrorRepository {
    /// Create a new backup error repository.
    pub fn new(db: &DatabasePool) -> Self {
        Self {
            pool: db.pool().clone(),
            tracker: db.tracker(),
        }
    }
}

async fn get_errors(pool: &SqlitePool, folder_id: FolderId) -> AppResult<Vec<BackupError>> {
    let mut errors =
        sqlx::query_as::<_, BackupError>("SELECT * FROM backup_errors WHERE folder_id = ?")
            .bind(folder_id)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list backup errors", e)
            })?;
    // Stored as text, so SQL ordering would be alphabetical.
    errors.sort_by_key(|error| error.error_type);
    Ok(errors)
}

#[async_trait]
impl BackupErrorRepository for SqliteBackupErrorRepository {
    async fn insert_error(&self, error: &BackupError) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO backup_errors (folder_id, error_type, retryable, created_at) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT (folder_id, error_type) DO UPDATE SET \
             retryable = excluded.retryable, created_at = excluded.created_at",
        )
        .bind(error.folder_id)
        .bind(error.error_type)
        .bind(error.retryable)
        .bind(error.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert backup error", e))?;
        self.tracker.invalidate(Table::BackupErrors);
        Ok(())
    }

    async fn get_errors(&self, folder_id: FolderId) -> AppResult<Vec<BackupError>> {
        get_errors(&self.pool, folder_id).await
    }

    fn observe_errors(&self, folder_id: FolderId) -> QueryObservable<Vec<BackupError>> {
        let pool = self.pool.clone();
        self.tracker.observe(Table::BackupErrors, move || {
            let pool = pool.clone();
            async move { get_errors(&pool, folder_id).await }
        })
    }

    async fn delete_errors(&self, folder_id: FolderId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM backup_errors WHERE folder_id = ?")
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete backup errors", e)
            })?;
        if result.rows_affected() > 0 {
            self.tracker.invalidate(Table::BackupErrors);
        }
        Ok(result.rows_affected())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM backup_errors WHERE created_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to prune backup errors", e)
            })?;
        if result.rows_affected() > 0 {
            self.tracker.invalidate(Table::BackupErrors);
        }
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use photobackup_core::types::error_type::BackupErrorType;

    use super::*;
    use crate::migration::run_migrations;

    async fn repository() -> SqliteBackupErrorRepository {
        let db = DatabasePool::in_memory().await.unwrap();
        run_migrations(db.pool()).await.unwrap();
        SqliteBackupErrorRepository::new(&db)
    }

    #[tokio::test]
    async fn test_insert_upserts_per_type_and_orders_by_type() {
        let repo = repository().await;
        let folder_id = FolderId::new();

        repo.insert_error(&BackupError::new(folder_id, BackupErrorType::Other))
            .await
            .unwrap();
        repo.insert_error(&BackupError::new(folder_id, BackupErrorType::DriveStorage))
            .await
            .unwrap();
        repo.insert_error(&BackupError::new(folder_id, BackupErrorType::Other))
            .await
            .unwrap();

        let errors = repo.get_errors(folder_id).await.unwrap();
        let types: Vec<_> = errors.iter().map(|e| e.error_type).collect();
        assert_eq!(types, vec![BackupErrorType::DriveStorage, BackupErrorType::Other]);
        assert!(!errors[0].retryable);
        assert!(errors[1].retryable);
    }

    #[tokio::test]
    async fn test_delete_older_than_keeps_recent() {
        let repo = repository().await;
        let folder_id = FolderId::new();

        let mut stale = BackupError::new(folder_id, BackupErrorType::Connectivity);
        stale.created_at = Utc::now() - Duration::days(60);
        repo.insert_error(&stale).await.unwrap();
        repo.insert_error(&BackupError::new(folder_id, BackupErrorType::Permission))
            .await
            .unwrap();

        let removed = repo
            .delete_older_than(Utc::now() - Duration::days(30))
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let errors = repo.get_errors(folder_id).await.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_type, BackupErrorType::Permission);
        assert_eq!(repo.delete_errors(folder_id).await.unwrap(), 1);
    }
}
