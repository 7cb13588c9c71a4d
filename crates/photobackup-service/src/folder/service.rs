//! Folder binding operations.

use std::sync::Arc;

use tracing::{info, warn};

use photobackup_core::error::AppError;
use photobackup_core::events::{BackupEvent, BackupStopReason, EventBus};
use photobackup_core::observe::QueryObservable;
use photobackup_core::traits::BackupWorkScheduler;
use photobackup_core::types::id::FolderId;
use photobackup_entity::folder::BackupFolder;
use photobackup_entity::repository::{
    BackupErrorRepository, BackupFileRepository, BackupFolderRepository,
};

use crate::manager::BackupManager;

/// Enables and disables backup for bucket to folder bindings.
#[derive(Clone)]
pub struct FolderService {
    /// Folder bindings.
    folder_repo: Arc<dyn BackupFolderRepository>,
    /// File queue, cleared when a folder is disabled.
    file_repo: Arc<dyn BackupFileRepository>,
    /// Error history, cleared when a folder is enabled.
    error_repo: Arc<dyn BackupErrorRepository>,
    /// Run state.
    manager: Arc<BackupManager>,
    /// Pending folder work.
    scheduler: Arc<dyn BackupWorkScheduler>,
    /// Lifecycle announcements.
    events: EventBus,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folder_repo: Arc<dyn BackupFolderRepository>,
        file_repo: Arc<dyn BackupFileRepository>,
        error_repo: Arc<dyn BackupErrorRepository>,
        manager: Arc<BackupManager>,
        scheduler: Arc<dyn BackupWorkScheduler>,
        events: EventBus,
    ) -> Self {
        Self {
            folder_repo,
            file_repo,
            error_repo,
            manager,
            scheduler,
            events,
        }
    }

    /// Enable backup of a bucket into a folder.
    ///
    /// Clears the folder's error history and (re)starts its backup.
    pub async fn add_folder(&self, folder: BackupFolder) -> Result<(), AppError> {
        let folder_id = folder.folder_id;
        self.folder_repo.insert_folder(&folder).await?;
        let cleared = self.error_repo.delete_errors(folder_id).await?;
        self.manager.start(folder_id);
        self.events.publish(BackupEvent::Enabled { folder_id });

        info!(
            folder_id = %folder_id,
            bucket_id = folder.bucket_id,
            cleared_errors = cleared,
            "Backup enabled"
        );
        Ok(())
    }

    /// Disable backup of a folder.
    ///
    /// The binding goes first so observers see the folder disabled before
    /// its file rows are cleaned up.
    pub async fn delete_folders(&self, folder_id: FolderId) -> Result<(), AppError> {
        let folders = self.folder_repo.delete_folders(folder_id).await?;
        let files = self.file_repo.delete_files(folder_id).await?;
        self.manager.stop(folder_id, BackupStopReason::Disabled);

        match self.scheduler.cancel_folder_work(folder_id).await {
            Ok(cancelled) if cancelled > 0 => {
                info!(folder_id = %folder_id, jobs = cancelled, "Cancelled pending folder work")
            }
            Ok(_) => {}
            Err(e) => warn!(folder_id = %folder_id, error = %e, "Failed to cancel folder work"),
        }

        self.events.publish(BackupEvent::Disabled { folder_id });
        info!(
            folder_id = %folder_id,
            bindings = folders,
            files = files,
            "Backup disabled"
        );
        Ok(())
    }

    /// Whether backup is enabled for the folder.
    pub async fn has_folders(&self, folder_id: FolderId) -> Result<bool, AppError> {
        self.folder_repo.has_folders(folder_id).await
    }

    /// [`Self::has_folders`] now and after every change.
    pub fn observe_has_folders(&self, folder_id: FolderId) -> QueryObservable<bool> {
        self.folder_repo.observe_has_folders(folder_id)
    }

    /// Bindings of a folder.
    pub async fn get_folders(&self, folder_id: FolderId) -> Result<Vec<BackupFolder>, AppError> {
        self.folder_repo.get_all(folder_id).await
    }

    /// Every binding.
    pub async fn get_all_folders(&self) -> Result<Vec<BackupFolder>, AppError> {
        self.folder_repo.get_all_folders().await
    }
}
