//! Backup folder repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use photobackup_core::error::{AppError, ErrorKind};
use photobackup_core::observe::QueryObservable;
use photobackup_core::result::AppResult;
use photobackup_core::types::id::FolderId;
use photobackup_entity::folder::BackupFolder;
use photobackup_entity::repository::BackupFolderRepository;

use crate::connection::DatabasePool;
use crate::invalidation::{InvalidationTracker, Table};

/// Repository for bucket to folder bindings.
#[derive(Debug, Clone)]
pub struct SqliteBackupFolderRepository {
    pool: SqlitePool,
    tracker: Arc<InvalidationTracker>,
}

impl SqliteBackupFolderRepository {
    /// Create a new backup folder repository.
    pub fn new(db: &DatabasePool) -> Self {
        Self {
            pool: db.pool().clone(),
            tracker: db.tracker(),
        }
    }
}

async fn has_folders(pool: &SqlitePool, folder_id: FolderId) -> AppResult<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM backup_folders WHERE folder_id = ?)",
    )
    .bind(folder_id)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check backup folders", e))
}

#[async_trait]
impl BackupFolderRepository for SqliteBackupFolderRepository {
    async fn insert_folder(&self, folder: &BackupFolder) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO backup_folders (bucket_id, folder_id, update_time) VALUES (?, ?, ?) \
             ON CONFLICT (bucket_id, folder_id) DO UPDATE SET update_time = excluded.update_time",
        )
        .bind(folder.bucket_id)
        .bind(folder.folder_id)
        .bind(folder.update_time)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert backup folder", e)
        })?;
        self.tracker.invalidate(Table::BackupFolders);
        Ok(())
    }

    async fn delete_folders(&self, folder_id: FolderId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM backup_folders WHERE folder_id = ?")
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete backup folders", e)
            })?;
        if result.rows_affected() > 0 {
            self.tracker.invalidate(Table::BackupFolders);
        }
        Ok(result.rows_affected())
    }

    async fn get_all(&self, folder_id: FolderId) -> AppResult<Vec<BackupFolder>> {
        sqlx::query_as::<_, BackupFolder>(
            "SELECT * FROM backup_folders WHERE folder_id = ? ORDER BY bucket_id ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list backup folders", e))
    }

    async fn get_all_folders(&self) -> AppResult<Vec<BackupFolder>> {
        sqlx::query_as::<_, BackupFolder>(
            "SELECT * FROM backup_folders ORDER BY folder_id ASC, bucket_id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list backup folders", e))
    }

    async fn has_folders(&self, folder_id: FolderId) -> AppResult<bool> {
        has_folders(&self.pool, folder_id).await
    }

    fn observe_has_folders(&self, folder_id: FolderId) -> QueryObservable<bool> {
        let pool = self.pool.clone();
        self.tracker.observe(Table::BackupFolders, move || {
            let pool = pool.clone();
            async move { has_folders(&pool, folder_id).await }
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::migration::run_migrations;

    async fn repository() -> SqliteBackupFolderRepository {
        let db = DatabasePool::in_memory().await.unwrap();
        run_migrations(db.pool()).await.unwrap();
        SqliteBackupFolderRepository::new(&db)
    }

    #[tokio::test]
    async fn test_insert_is_idempotent_per_pair() {
        let repo = repository().await;
        let folder_id = FolderId::new();

        repo.insert_folder(&BackupFolder::new(1, folder_id)).await.unwrap();
        repo.insert_folder(&BackupFolder::new(1, folder_id)).await.unwrap();
        repo.insert_folder(&BackupFolder::new(2, folder_id)).await.unwrap();

        let folders = repo.get_all(folder_id).await.unwrap();
        assert_eq!(folders.len(), 2);
        assert_eq!(folders[0].bucket_id, 1);
        assert_eq!(repo.get_all_folders().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_observe_has_folders_follows_writes() {
        let repo = repository().await;
        let folder_id = FolderId::new();
        let mut observed = repo.observe_has_folders(folder_id);

        assert!(!observed.next().await.unwrap().unwrap());

        repo.insert_folder(&BackupFolder::new(7, folder_id)).await.unwrap();
        assert!(observed.next().await.unwrap().unwrap());

        assert_eq!(repo.delete_folders(folder_id).await.unwrap(), 1);
        assert!(!observed.next().await.unwrap().unwrap());
        assert!(!repo.has_folders(folder_id).await.unwrap());
    }
}
