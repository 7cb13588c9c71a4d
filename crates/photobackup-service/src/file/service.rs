//! File queue operations.

use std::sync::Arc;

use tracing::{debug, info};

use photobackup_core::error::AppError;
use photobackup_core::types::id::FolderId;
use photobackup_entity::file::{BackupFile, BackupFileState};
use photobackup_entity::repository::BackupFileRepository;

/// Moves files through the backup lifecycle.
#[derive(Clone)]
pub struct FileService {
    /// File queue.
    file_repo: Arc<dyn BackupFileRepository>,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(file_repo: Arc<dyn BackupFileRepository>) -> Self {
        Self { file_repo }
    }

    /// Track newly enumerated files. Files already tracked keep their state.
    pub async fn set_files(&self, files: Vec<BackupFile>) -> Result<u64, AppError> {
        let inserted = self.file_repo.insert_files(&files).await?;
        info!(offered = files.len(), inserted, "Backup files set");
        Ok(inserted)
    }

    /// Tracked files of a folder.
    pub async fn get_files(&self, folder_id: FolderId) -> Result<Vec<BackupFile>, AppError> {
        self.file_repo.get_files(folder_id).await
    }

    /// Mark a file uploaded.
    pub async fn mark_as_completed(
        &self,
        folder_id: FolderId,
        uri_string: &str,
    ) -> Result<bool, AppError> {
        self.mark(folder_id, uri_string, BackupFileState::Completed).await
    }

    /// Mark a file as failed; it is skipped until failed files are reset.
    pub async fn mark_as_failed(
        &self,
        folder_id: FolderId,
        uri_string: &str,
    ) -> Result<bool, AppError> {
        self.mark(folder_id, uri_string, BackupFileState::Failed).await
    }

    /// Mark a file handed to the upload pipeline.
    pub async fn mark_as_enqueued(
        &self,
        folder_id: FolderId,
        uri_string: &str,
    ) -> Result<bool, AppError> {
        self.mark(folder_id, uri_string, BackupFileState::Enqueued).await
    }

    /// Stop tracking a file. Deleting an untracked file is not an error.
    pub async fn delete_file(
        &self,
        folder_id: FolderId,
        uri_string: &str,
    ) -> Result<bool, AppError> {
        let deleted = self.file_repo.delete_file(folder_id, uri_string).await?;
        debug!(folder_id = %folder_id, uri = uri_string, deleted, "Backup file deleted");
        Ok(deleted)
    }

    /// Put every failed file of a folder back in the queue.
    pub async fn reset_failed(&self, folder_id: FolderId) -> Result<u64, AppError> {
        let reset = self
            .file_repo
            .update_states(folder_id, BackupFileState::Failed, BackupFileState::Idle)
            .await?;
        info!(folder_id = %folder_id, files = reset, "Failed backup files reset");
        Ok(reset)
    }

    async fn mark(
        &self,
        folder_id: FolderId,
        uri_string: &str,
        state: BackupFileState,
    ) -> Result<bool, AppError> {
        let updated = self
            .file_repo
            .update_state(folder_id, uri_string, state)
            .await?;
        if !updated {
            debug!(folder_id = %folder_id, uri = uri_string, %state, "Backup file not tracked");
        }
        Ok(updated)
    }
}
