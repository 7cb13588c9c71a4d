//! Persistence contracts for backup entities.
//!
//! The service layer is written against these traits; `photobackup-database`
//! implements them on SQLite and the host platform implements
//! [`BucketRepository`]. Each `observe_*` method returns a stream that yields
//! the query result immediately and again after every write to the
//! underlying table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use photobackup_core::observe::QueryObservable;
use photobackup_core::result::AppResult;
use photobackup_core::types::id::FolderId;

use crate::bucket::BucketEntry;
use crate::configuration::BackupConfiguration;
use crate::error::BackupError;
use crate::file::{BackupFile, BackupFileState};
use crate::folder::{BackupFolder, DriveFolder};
use crate::state::BackupFileCounts;

/// Enumerates device media buckets.
#[async_trait]
pub trait BucketRepository: Send + Sync + 'static {
    /// All buckets on the device, regardless of permission.
    async fn get_all(&self) -> AppResult<Vec<BucketEntry>>;
}

/// Folders enabled for backup.
#[async_trait]
pub trait BackupFolderRepository: Send + Sync + 'static {
    /// Insert a binding, or refresh it if the pair already exists.
    async fn insert_folder(&self, folder: &BackupFolder) -> AppResult<()>;

    /// Delete every binding of a destination folder.
    async fn delete_folders(&self, folder_id: FolderId) -> AppResult<u64>;

    /// Bindings of a destination folder.
    async fn get_all(&self, folder_id: FolderId) -> AppResult<Vec<BackupFolder>>;

    /// Every binding, across folders.
    async fn get_all_folders(&self) -> AppResult<Vec<BackupFolder>>;

    /// Whether the destination folder has at least one binding.
    async fn has_folders(&self, folder_id: FolderId) -> AppResult<bool>;

    /// [`Self::has_folders`], re-evaluated after every binding change.
    fn observe_has_folders(&self, folder_id: FolderId) -> QueryObservable<bool>;
}

/// Per-file backup queue.
#[async_trait]
pub trait BackupFileRepository: Send + Sync + 'static {
    /// Insert files; a file already tracked for the folder keeps its state.
    /// Returns how many rows were inserted.
    async fn insert_files(&self, files: &[BackupFile]) -> AppResult<u64>;

    /// One tracked file.
    async fn get_file(&self, folder_id: FolderId, uri_string: &str)
    -> AppResult<Option<BackupFile>>;

    /// All tracked files of a folder.
    async fn get_files(&self, folder_id: FolderId) -> AppResult<Vec<BackupFile>>;

    /// Move one file to `state`. Returns `false` if the file is not tracked.
    async fn update_state(
        &self,
        folder_id: FolderId,
        uri_string: &str,
        state: BackupFileState,
    ) -> AppResult<bool>;

    /// Move every file of a folder in state `from` to state `to`.
    async fn update_states(
        &self,
        folder_id: FolderId,
        from: BackupFileState,
        to: BackupFileState,
    ) -> AppResult<u64>;

    /// Stop tracking one file. Returns `false` if it was not tracked.
    async fn delete_file(&self, folder_id: FolderId, uri_string: &str) -> AppResult<bool>;

    /// Stop tracking every file of a folder.
    async fn delete_files(&self, folder_id: FolderId) -> AppResult<u64>;

    /// File counts by state.
    async fn count_by_state(&self, folder_id: FolderId) -> AppResult<BackupFileCounts>;

    /// [`Self::count_by_state`], re-evaluated after every file change.
    fn observe_counts(&self, folder_id: FolderId) -> QueryObservable<BackupFileCounts>;
}

/// Backup error history.
#[async_trait]
pub trait BackupErrorRepository: Send + Sync + 'static {
    /// Record an error, superseding an earlier one of the same type.
    async fn insert_error(&self, error: &BackupError) -> AppResult<()>;

    /// Errors of a folder, ordered by type.
    async fn get_errors(&self, folder_id: FolderId) -> AppResult<Vec<BackupError>>;

    /// [`Self::get_errors`], re-evaluated after every error change.
    fn observe_errors(&self, folder_id: FolderId) -> QueryObservable<Vec<BackupError>>;

    /// Forget every error of a folder.
    async fn delete_errors(&self, folder_id: FolderId) -> AppResult<u64>;

    /// Forget errors recorded before `cutoff`.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// Per-folder backup configuration.
#[async_trait]
pub trait BackupConfigurationRepository: Send + Sync + 'static {
    /// Configuration of a folder, if one was ever saved.
    async fn get_configuration(&self, folder_id: FolderId)
    -> AppResult<Option<BackupConfiguration>>;

    /// [`Self::get_configuration`], re-evaluated after every change.
    fn observe_configuration(
        &self,
        folder_id: FolderId,
    ) -> QueryObservable<Option<BackupConfiguration>>;

    /// Save a folder's configuration.
    async fn upsert_configuration(&self, configuration: &BackupConfiguration) -> AppResult<()>;
}

/// Destination folders in remote storage.
#[async_trait]
pub trait DriveFolderRepository: Send + Sync + 'static {
    /// Look up a folder.
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<DriveFolder>>;

    /// Whether the folder exists, re-evaluated after every change.
    fn observe_exists(&self, id: FolderId) -> QueryObservable<bool>;

    /// Insert or rename a folder.
    async fn upsert_folder(&self, folder: &DriveFolder) -> AppResult<()>;

    /// Delete a folder. Returns `false` if it did not exist.
    async fn delete_folder(&self, id: FolderId) -> AppResult<bool>;
}
