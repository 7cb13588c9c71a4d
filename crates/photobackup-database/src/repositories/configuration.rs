//! Backup configuration repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use photobackup_core::error::{AppError, ErrorKind};
use photobackup_core::observe::QueryObservable;
use photobackup_core::result::AppResult;
use photobackup_core::types::id::FolderId;
use photobackup_entity::configuration::BackupConfiguration;
use photobackup_entity::repository::BackupConfigurationRepository;

use crate::connection::DatabasePool;
use crate::invalidation::{InvalidationTracker, Table};

/// Repository for per-folder backup settings.
#[derive(Debug, Clone)]
pub struct SqliteBackupConfigurationRepository {
    pool: SqlitePool,
    tracker: Arc<InvalidationTracker>,
}

impl SqliteBackupConfigurationRepository {
    /// Create a new configuration repository.
    pub fn new(db: &DatabasePool) -> Self {
        Self {
            pool: db.pool().clone(),
            tracker: db.tracker(),
        }
    }
}

async fn get_configuration(
    pool: &SqlitePool,
    folder_id: FolderId,
) -> AppResult<Option<BackupConfiguration>> {
    sqlx::query_as::<_, BackupConfiguration>(
        "SELECT * FROM backup_configurations WHERE folder_id = ?",
    )
    .bind(folder_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to find backup configuration", e)
    })
}

#[async_trait]
impl BackupConfigurationRepository for SqliteBackupConfigurationRepository {
    async fn get_configuration(
        &self,
        folder_id: FolderId,
    ) -> AppResult<Option<BackupConfiguration>> {
        get_configuration(&self.pool, folder_id).await
    }

    fn observe_configuration(
        &self,
        folder_id: FolderId,
    ) -> QueryObservable<Option<BackupConfiguration>> {
        let pool = self.pool.clone();
        self.tracker.observe(Table::BackupConfigurations, move || {
            let pool = pool.clone();
            async move { get_configuration(&pool, folder_id).await }
        })
    }

    async fn upsert_configuration(&self, configuration: &BackupConfiguration) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO backup_configurations (folder_id, network_type) VALUES (?, ?) \
             ON CONFLICT (folder_id) DO UPDATE SET network_type = excluded.network_type",
        )
        .bind(configuration.folder_id)
        .bind(configuration.network_type)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to save backup configuration", e)
        })?;
        self.tracker.invalidate(Table::BackupConfigurations);
        Ok(())
    }
}
