//! Drive folder repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use photobackup_core::error::{AppError, ErrorKind};
use photobackup_core::observe::QueryObservable;
use photobackup_core::result::AppResult;
use photobackup_core::types::id::FolderId;
use photobackup_entity::folder::DriveFolder;
use photobackup_entity::repository::DriveFolderRepository;

use crate::connection::DatabasePool;
use crate::invalidation::{InvalidationTracker, Table};

/// Repository for locally known destination folders.
#[derive(Debug, Clone)]
pub struct SqliteDriveFolderRepository {
    pool: SqlitePool,
    tracker: Arc<InvalidationTracker>,
}

impl SqliteDriveFolderRepository {
    /// Create a new drive folder repository.
    pub fn new(db: &DatabasePool) -> Self {
        Self {
            pool: db.pool().clone(),
            tracker: db.tracker(),
        }
    }
}

async fn exists(pool: &SqlitePool, id: FolderId) -> AppResult<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM drive_folders WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check drive folder", e))
}

#[async_trait]
impl DriveFolderRepository for SqliteDriveFolderRepository {
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<DriveFolder>> {
        sqlx::query_as::<_, DriveFolder>("SELECT * FROM drive_folders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find drive folder", e)
            })
    }

    fn observe_exists(&self, id: FolderId) -> QueryObservable<bool> {
        let pool = self.pool.clone();
        self.tracker.observe(Table::DriveFolders, move || {
            let pool = pool.clone();
            async move { exists(&pool, id).await }
        })
    }

    async fn upsert_folder(&self, folder: &DriveFolder) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO drive_folders (id, name) VALUES (?, ?) \
             ON CONFLICT (id) DO UPDATE SET name = excluded.name",
        )
        .bind(folder.id)
        .bind(&folder.name)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save drive folder", e))?;
        self.tracker.invalidate(Table::DriveFolders);
        Ok(())
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM drive_folders WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete drive folder", e)
            })?;
        if result.rows_affected() > 0 {
            self.tracker.invalidate(Table::DriveFolders);
        }
        Ok(result.rows_affected() > 0)
    }
}
