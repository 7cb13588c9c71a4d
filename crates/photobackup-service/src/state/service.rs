//! Fan-in of every backup input into one [`BackupState`].

use std::sync::Arc;

use futures::StreamExt;
use futures::stream::select_all;
use tokio::sync::watch;
use tracing::{debug, warn};

use photobackup_core::config::BackupConfig;
use photobackup_core::observe::{Observable, QueryObservable};
use photobackup_core::traits::{ConnectivitySource, PermissionSource};
use photobackup_core::types::id::FolderId;
use photobackup_entity::repository::{
    BackupErrorRepository, BackupFolderRepository, DriveFolderRepository,
};
use photobackup_entity::state::BackupState;

use super::inputs::{Input, Latest};
use super::watch::BackupStateWatch;
use crate::bucket::GetAllBuckets;
use crate::configuration::ConfigurationService;
use crate::file::GetBackupStatus;

/// Computes a folder's [`BackupState`] continuously.
///
/// Each input is observed independently. Whenever any of them emits, the
/// state is re-derived from the latest value of every input and published
/// if it differs from the previous one. A failing query is logged and its
/// last good value is kept.
#[derive(Clone)]
pub struct GetBackupState {
    folder_repo: Arc<dyn BackupFolderRepository>,
    drive_folder_repo: Arc<dyn DriveFolderRepository>,
    error_repo: Arc<dyn BackupErrorRepository>,
    permissions: Arc<dyn PermissionSource>,
    connectivity: Arc<dyn ConnectivitySource>,
    buckets: GetAllBuckets,
    configuration: ConfigurationService,
    status: GetBackupStatus,
    default_bucket_name: Arc<str>,
}

impl GetBackupState {
    /// Creates a new backup state use case.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        folder_repo: Arc<dyn BackupFolderRepository>,
        drive_folder_repo: Arc<dyn DriveFolderRepository>,
        error_repo: Arc<dyn BackupErrorRepository>,
        permissions: Arc<dyn PermissionSource>,
        connectivity: Arc<dyn ConnectivitySource>,
        buckets: GetAllBuckets,
        configuration: ConfigurationService,
        status: GetBackupStatus,
        config: &BackupConfig,
    ) -> Self {
        Self {
            folder_repo,
            drive_folder_repo,
            error_repo,
            permissions,
            connectivity,
            buckets,
            configuration,
            status,
            default_bucket_name: Arc::from(config.default_bucket_name.as_str()),
        }
    }

    /// Start computing the state of `folder_id`.
    ///
    /// Must be called inside a Tokio runtime. The computation runs until the
    /// returned handle is dropped.
    pub fn execute(&self, folder_id: FolderId) -> BackupStateWatch {
        let inputs = select_all(self.inputs(folder_id));
        let (tx, rx) = watch::channel(None);
        let default_bucket_name = Arc::clone(&self.default_bucket_name);

        let task = tokio::spawn(async move {
            let mut inputs = inputs;
            let mut latest = Latest::default();
            while let Some(input) = inputs.next().await {
                latest.apply(input, &default_bucket_name);
                let Some(state) = latest.derive() else {
                    continue;
                };
                tx.send_if_modified(|current| {
                    if current.as_ref() == Some(&state) {
                        return false;
                    }
                    debug!(folder_id = %folder_id, ?state, "Backup state changed");
                    *current = Some(state);
                    true
                });
            }
            debug!(folder_id = %folder_id, "Backup state inputs ended");
        });

        BackupStateWatch::new(rx, task)
    }

    fn inputs(&self, folder_id: FolderId) -> Vec<Observable<Input>> {
        vec![
            logged(self.folder_repo.observe_has_folders(folder_id), "enabled")
                .map(Input::Enabled)
                .boxed(),
            logged(self.drive_folder_repo.observe_exists(folder_id), "folder")
                .map(Input::FolderExists)
                .boxed(),
            self.permissions.observe().map(Input::Permissions).boxed(),
            self.connectivity.observe().map(Input::Connectivity).boxed(),
            logged(self.buckets.observe(), "buckets")
                .map(Input::Buckets)
                .boxed(),
            logged(self.configuration.observe_configuration(folder_id), "configuration")
                .map(|configuration| Input::NetworkType(configuration.network_type))
                .boxed(),
            logged(self.status.observe(folder_id), "status")
                .map(Input::Status)
                .boxed(),
            logged(self.error_repo.observe_errors(folder_id), "errors")
                .map(|errors| Input::Errors(errors.iter().map(|e| e.error_type).collect()))
                .boxed(),
        ]
    }
}

/// Drop failed emissions of a query, logging them.
fn logged<T>(stream: QueryObservable<T>, input: &'static str) -> Observable<T>
where
    T: Send + 'static,
{
    stream
        .filter_map(move |result| {
            futures::future::ready(match result {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(input, error = %e, "Backup state input failed");
                    None
                }
            })
        })
        .boxed()
}
