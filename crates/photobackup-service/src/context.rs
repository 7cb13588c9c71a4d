//! Construction of the whole service graph.

use std::sync::Arc;

use photobackup_core::config::BackupConfig;
use photobackup_core::events::EventBus;
use photobackup_core::traits::{BackupWorkScheduler, ConnectivitySource, PermissionSource};
use photobackup_entity::repository::{
    BackupConfigurationRepository, BackupErrorRepository, BackupFileRepository,
    BackupFolderRepository, BucketRepository, DriveFolderRepository,
};

use crate::bucket::GetAllBuckets;
use crate::configuration::ConfigurationService;
use crate::error::GetErrors;
use crate::file::{FileService, GetBackupStatus};
use crate::folder::FolderService;
use crate::handler::{StopBackup, UploadErrorHandler};
use crate::manager::{BackupConnectivityManager, BackupManager, BackupPermissionsManager};
use crate::state::GetBackupState;

/// Every repository the services need.
#[derive(Clone)]
pub struct BackupRepositories {
    /// Device buckets, provided by the host.
    pub buckets: Arc<dyn BucketRepository>,
    /// Folder bindings.
    pub folders: Arc<dyn BackupFolderRepository>,
    /// File queue.
    pub files: Arc<dyn BackupFileRepository>,
    /// Error history.
    pub errors: Arc<dyn BackupErrorRepository>,
    /// Folder configurations.
    pub configurations: Arc<dyn BackupConfigurationRepository>,
    /// Destination folders.
    pub drive_folders: Arc<dyn DriveFolderRepository>,
}

/// The assembled backup services, sharing one set of managers.
#[derive(Clone)]
pub struct BackupServices {
    /// Media permission state.
    pub permissions: Arc<BackupPermissionsManager>,
    /// Network connectivity state.
    pub connectivity: Arc<BackupConnectivityManager>,
    /// Folder run state.
    pub manager: Arc<BackupManager>,
    /// Folder enable/disable.
    pub folders: FolderService,
    /// File lifecycle.
    pub files: FileService,
    /// Progress status.
    pub status: GetBackupStatus,
    /// Error history and user-facing errors.
    pub errors: GetErrors,
    /// Eligible buckets.
    pub buckets: GetAllBuckets,
    /// Folder settings.
    pub configuration: ConfigurationService,
    /// Folder-fatal stop.
    pub stop_backup: StopBackup,
    /// Upload failure reactions.
    pub upload_errors: Arc<UploadErrorHandler>,
    /// Reactive folder state.
    pub state: GetBackupState,
}

impl BackupServices {
    /// Wire the services over the given repositories and collaborators.
    pub fn new(
        repos: BackupRepositories,
        scheduler: Arc<dyn BackupWorkScheduler>,
        events: EventBus,
        config: &BackupConfig,
    ) -> Self {
        let permissions = Arc::new(BackupPermissionsManager::permissions());
        let connectivity = Arc::new(BackupConnectivityManager::connectivity());
        let permission_source: Arc<dyn PermissionSource> = permissions.clone();
        let connectivity_source: Arc<dyn ConnectivitySource> = connectivity.clone();

        let manager = Arc::new(BackupManager::new(repos.folders.clone(), events.clone()));
        let files = FileService::new(repos.files.clone());
        let status = GetBackupStatus::new(repos.files.clone());
        let configuration = ConfigurationService::new(repos.configurations.clone(), config);
        let buckets = GetAllBuckets::new(repos.buckets.clone(), permission_source.clone());
        let errors = GetErrors::new(
            repos.errors.clone(),
            permission_source.clone(),
            connectivity_source.clone(),
            configuration.clone(),
        );
        let folders = FolderService::new(
            repos.folders.clone(),
            repos.files.clone(),
            repos.errors.clone(),
            manager.clone(),
            scheduler.clone(),
            events,
        );
        let stop_backup = StopBackup::new(manager.clone(), repos.errors.clone());
        let upload_errors = Arc::new(UploadErrorHandler::new(
            repos.folders.clone(),
            files.clone(),
            scheduler,
            stop_backup.clone(),
        ));
        let state = GetBackupState::new(
            repos.folders,
            repos.drive_folders,
            repos.errors,
            permission_source,
            connectivity_source,
            buckets.clone(),
            configuration.clone(),
            status.clone(),
            config,
        );

        Self {
            permissions,
            connectivity,
            manager,
            folders,
            files,
            status,
            errors,
            buckets,
            configuration,
            stop_backup,
            upload_errors,
            state,
        }
    }
}
