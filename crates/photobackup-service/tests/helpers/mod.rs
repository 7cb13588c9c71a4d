//! Shared test helpers for service integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;

use photobackup_core::config::BackupConfig;
use photobackup_core::error::AppError;
use photobackup_core::events::EventBus;
use photobackup_core::observe::QueryObservable;
use photobackup_core::result::AppResult;
use photobackup_core::traits::BackupWorkScheduler;
use photobackup_core::types::id::FolderId;
use photobackup_core::types::signal::{BackupConnectivity, BackupPermissions};
use photobackup_database::DatabasePool;
use photobackup_database::migration::run_migrations;
use photobackup_database::repositories::{
    SqliteBackupConfigurationRepository, SqliteBackupErrorRepository, SqliteBackupFileRepository,
    SqliteBackupFolderRepository, SqliteDriveFolderRepository,
};
use photobackup_entity::bucket::BucketEntry;
use photobackup_entity::error::BackupError;
use photobackup_entity::file::{BackupFile, BackupFileState};
use photobackup_entity::repository::{BackupErrorRepository, BucketRepository};
use photobackup_service::{BackupRepositories, BackupServices};

/// Upper bound for waiting on asynchronous state.
pub const WAIT: Duration = Duration::from_secs(5);

/// Work scheduler that records every request.
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    /// Folders a notification was scheduled for.
    pub notifications: Mutex<Vec<FolderId>>,
    /// Folders whose work was cancelled.
    pub cancellations: Mutex<Vec<FolderId>>,
    /// When set, every request fails.
    pub failing: Mutex<bool>,
}

impl RecordingScheduler {
    /// Folders notified so far.
    pub fn notified(&self) -> Vec<FolderId> {
        self.notifications.lock().unwrap().clone()
    }

    /// Folders cancelled so far.
    pub fn cancelled(&self) -> Vec<FolderId> {
        self.cancellations.lock().unwrap().clone()
    }

    /// Make every further request fail.
    pub fn fail(&self) {
        *self.failing.lock().unwrap() = true;
    }

    fn check(&self) -> AppResult<()> {
        if *self.failing.lock().unwrap() {
            return Err(AppError::scheduling("scheduler unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl BackupWorkScheduler for RecordingScheduler {
    async fn schedule_notification(&self, folder_id: FolderId) -> AppResult<()> {
        self.check()?;
        self.notifications.lock().unwrap().push(folder_id);
        Ok(())
    }

    async fn cancel_folder_work(&self, folder_id: FolderId) -> AppResult<u64> {
        self.check()?;
        self.cancellations.lock().unwrap().push(folder_id);
        Ok(0)
    }
}

/// Device buckets set by the test.
#[derive(Debug, Default)]
pub struct StubBuckets {
    /// Buckets returned by `get_all`.
    pub buckets: Mutex<Vec<BucketEntry>>,
}

#[async_trait]
impl BucketRepository for StubBuckets {
    async fn get_all(&self) -> AppResult<Vec<BucketEntry>> {
        Ok(self.buckets.lock().unwrap().clone())
    }
}

/// Error store whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingErrors;

impl FailingErrors {
    fn unavailable<T>() -> AppResult<T> {
        Err(AppError::internal("error store unavailable"))
    }
}

#[async_trait]
impl BackupErrorRepository for FailingErrors {
    async fn insert_error(&self, _error: &BackupError) -> AppResult<()> {
        Self::unavailable()
    }

    async fn get_errors(&self, _folder_id: FolderId) -> AppResult<Vec<BackupError>> {
        Self::unavailable()
    }

    fn observe_errors(&self, _folder_id: FolderId) -> QueryObservable<Vec<BackupError>> {
        futures::stream::once(async { Self::unavailable() }).boxed()
    }

    async fn delete_errors(&self, _folder_id: FolderId) -> AppResult<u64> {
        Self::unavailable()
    }

    async fn delete_older_than(&self, _cutoff: DateTime<Utc>) -> AppResult<u64> {
        Self::unavailable()
    }
}

/// Services over an in-memory database.
pub struct TestBackup {
    /// Database for direct repository access.
    pub db: DatabasePool,
    /// Repositories the services were built on.
    pub repos: BackupRepositories,
    /// The services under test.
    pub services: BackupServices,
    /// Recording scheduler.
    pub scheduler: Arc<RecordingScheduler>,
    /// Device buckets.
    pub buckets: Arc<StubBuckets>,
    /// Event bus shared by the services.
    pub events: EventBus,
}

impl TestBackup {
    /// Build services over a fresh migrated in-memory database, with the
    /// permission granted, an unmetered connection, and a "Camera" bucket.
    pub async fn new() -> Self {
        let db = DatabasePool::in_memory()
            .await
            .expect("Failed to open in-memory database");
        run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let buckets = Arc::new(StubBuckets::default());
        *buckets.buckets.lock().unwrap() = vec![
            BucketEntry::new(1, "Camera"),
            BucketEntry::new(2, "Screenshots"),
        ];

        let repos = BackupRepositories {
            buckets: buckets.clone(),
            folders: Arc::new(SqliteBackupFolderRepository::new(&db)),
            files: Arc::new(SqliteBackupFileRepository::new(&db)),
            errors: Arc::new(SqliteBackupErrorRepository::new(&db)),
            configurations: Arc::new(SqliteBackupConfigurationRepository::new(&db)),
            drive_folders: Arc::new(SqliteDriveFolderRepository::new(&db)),
        };
        let scheduler = Arc::new(RecordingScheduler::default());
        let events = EventBus::new();
        let services = BackupServices::new(
            repos.clone(),
            scheduler.clone(),
            events.clone(),
            &BackupConfig::default(),
        );
        services.permissions.set(BackupPermissions::Granted);
        services.connectivity.set(BackupConnectivity::Unmetered);

        Self {
            db,
            repos,
            services,
            scheduler,
            buckets,
            events,
        }
    }
}

/// A file in `state` for `folder_id`.
pub fn backup_file(folder_id: FolderId, uri: &str, state: BackupFileState) -> BackupFile {
    BackupFile {
        bucket_id: 1,
        folder_id,
        uri_string: uri.to_string(),
        mime_type: "image/jpeg".to_string(),
        name: format!("{uri}.jpg"),
        hash: format!("hash-{uri}"),
        size: 2048,
        state,
        date: Utc::now(),
    }
}
