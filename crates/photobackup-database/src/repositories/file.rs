//! Backup file repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use photobackup_core::error::{AppError, ErrorKind};
use photobackup_core::observe::QueryObservable;
use photobackup_core::result::AppResult;
use photobackup_core::types::id::FolderId;
use photobackup_entity::file::{BackupFile, BackupFileState};
use photobackup_entity::repository::BackupFileRepository;
use photobackup_entity::state::BackupFileCounts;

use crate::connection::DatabasePool;
use crate::invalidation::{InvalidationTracker, Table};

/// Repository for the per-file backup queue.
#[derive(Debug, Clone)]
pub struct SqliteBackupFileRepository {
    pool: SqlitePool,
    tracker: Arc<InvalidationTracker>,
}

impl SqliteBackupFileRepository {
    /// Create a new backup file repository.
    pub fn new(db: &DatabasePool) -> Self {
        Self {
            pool: db.pool().clone(),
            tracker: db.tracker(),
        }
    }

    fn invalidate_if(&self, rows: u64) -> u64 {
        if rows > 0 {
            self.tracker.invalidate(Table::BackupFiles);
        }
        rows
    }
}

async fn count_by_state(pool: &SqlitePool, folder_id: FolderId) -> AppResult<BackupFileCounts> {
    sqlx::query_as::<_, BackupFileCounts>(
        "SELECT COUNT(*) AS total, \
         COALESCE(SUM(CASE WHEN state IN ('IDLE', 'ENQUEUED', 'READY') THEN 1 ELSE 0 END), 0) AS pending, \
         COALESCE(SUM(CASE WHEN state = 'FAILED' THEN 1 ELSE 0 END), 0) AS failed \
         FROM backup_files WHERE folder_id = ?",
    )
    .bind(folder_id)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count backup files", e))
}

#[async_trait]
impl BackupFileRepository for SqliteBackupFileRepository {
    async fn insert_files(&self, files: &[BackupFile]) -> AppResult<u64> {
        if files.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mut inserted = 0;
        for file in files {
            let result = sqlx::query(
                "INSERT INTO backup_files \
                 (folder_id, uri_string, bucket_id, mime_type, name, hash, size, state, date) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
                 ON CONFLICT (folder_id, uri_string) DO NOTHING",
            )
            .bind(file.folder_id)
            .bind(&file.uri_string)
            .bind(file.bucket_id)
            .bind(&file.mime_type)
            .bind(&file.name)
            .bind(&file.hash)
            .bind(file.size)
            .bind(file.state)
            .bind(file.date)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to insert backup file", e)
            })?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit backup files", e)
        })?;

        Ok(self.invalidate_if(inserted))
    }

    async fn get_file(
        &self,
        folder_id: FolderId,
        uri_string: &str,
    ) -> AppResult<Option<BackupFile>> {
        sqlx::query_as::<_, BackupFile>(
            "SELECT * FROM backup_files WHERE folder_id = ? AND uri_string = ?",
        )
        .bind(folder_id)
        .bind(uri_string)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find backup file", e))
    }

    async fn get_files(&self, folder_id: FolderId) -> AppResult<Vec<BackupFile>> {
        sqlx::query_as::<_, BackupFile>(
            "SELECT * FROM backup_files WHERE folder_id = ? ORDER BY date DESC, uri_string ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list backup files", e))
    }

    async fn update_state(
        &self,
        folder_id: FolderId,
        uri_string: &str,
        state: BackupFileState,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE backup_files SET state = ? WHERE folder_id = ? AND uri_string = ?",
        )
        .bind(state)
        .bind(folder_id)
        .bind(uri_string)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update backup file state", e)
        })?;
        Ok(self.invalidate_if(result.rows_affected()) > 0)
    }

    async fn update_states(
        &self,
        folder_id: FolderId,
        from: BackupFileState,
        to: BackupFileState,
    ) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE backup_files SET state = ? WHERE folder_id = ? AND state = ?")
                .bind(to)
                .bind(folder_id)
                .bind(from)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to update backup file states",
                        e,
                    )
                })?;
        Ok(self.invalidate_if(result.rows_affected()))
    }

    async fn delete_file(&self, folder_id: FolderId, uri_string: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM backup_files WHERE folder_id = ? AND uri_string = ?")
            .bind(folder_id)
            .bind(uri_string)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete backup file", e)
            })?;
        Ok(self.invalidate_if(result.rows_affected()) > 0)
    }

    async fn delete_files(&self, folder_id: FolderId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM backup_files WHERE folder_id = ?")
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete backup files", e)
            })?;
        Ok(self.invalidate_if(result.rows_affected()))
    }

    async fn count_by_state(&self, folder_id: FolderId) -> AppResult<BackupFileCounts> {
        count_by_state(&self.pool, folder_id).await
    }

    fn observe_counts(&self, folder_id: FolderId) -> QueryObservable<BackupFileCounts> {
        let pool = self.pool.clone();
        self.tracker.observe(Table::BackupFiles, move || {
            let pool = pool.clone();
            async move { count_by_state(&pool, folder_id).await }
        })
    }
}
