//! Aggregate progress of a folder's backup.

use std::sync::Arc;

use futures::StreamExt;

use photobackup_core::error::AppError;
use photobackup_core::observe::QueryObservable;
use photobackup_core::types::id::FolderId;
use photobackup_entity::repository::BackupFileRepository;
use photobackup_entity::state::BackupStatus;

/// Derives [`BackupStatus`] from file counts.
#[derive(Clone)]
pub struct GetBackupStatus {
    file_repo: Arc<dyn BackupFileRepository>,
}

impl GetBackupStatus {
    /// Creates a new status use case.
    pub fn new(file_repo: Arc<dyn BackupFileRepository>) -> Self {
        Self { file_repo }
    }

    /// Status right now.
    pub async fn execute(&self, folder_id: FolderId) -> Result<BackupStatus, AppError> {
        let counts = self.file_repo.count_by_state(folder_id).await?;
        Ok(BackupStatus::from_counts(counts))
    }

    /// Status now and after every file change.
    pub fn observe(&self, folder_id: FolderId) -> QueryObservable<BackupStatus> {
        self.file_repo
            .observe_counts(folder_id)
            .map(|counts| counts.map(|counts| BackupStatus::from_counts(counts)))
            .boxed()
    }
}
