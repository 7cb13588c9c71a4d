//! Upload failure handling.
//!
//! Every failed upload is offered to [`UploadErrorHandler::on_error`]. The
//! handler decides whether the failure concerns the backup, tells the user
//! about it through a deferred notification, and then applies the
//! corrective action for its class:
//!
//! | class | action |
//! |---|---|
//! | `NotFound` | stop tracking the file |
//! | `Permission`, `LocalStorage`, `DriveStorage`, `PhotosUploadNotAllowed` | stop the folder's backup |
//! | `Other` | mark the file failed |
//! | `Connectivity`, `WifiConnectivity` | nothing; the scheduler retries once the network is back |
//!
//! Nothing escapes the handler: failures of its own collaborators are
//! logged and dropped.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use photobackup_core::error::AppError;
use photobackup_core::events::{EventBus, EventPayload, UploadError};
use photobackup_core::traits::BackupWorkScheduler;
use photobackup_core::types::id::FolderId;
use photobackup_entity::repository::BackupFolderRepository;

use super::classify::{FailureClass, classify, has_effect_on_backup};
use super::stop::StopBackup;
use crate::file::FileService;

/// Reacts to failed uploads on behalf of the backup.
#[derive(Clone)]
pub struct UploadErrorHandler {
    /// Whether the destination folder is backed up.
    folder_repo: Arc<dyn BackupFolderRepository>,
    /// Per-file corrections.
    files: FileService,
    /// Notifications.
    scheduler: Arc<dyn BackupWorkScheduler>,
    /// Folder-fatal corrections.
    stop_backup: StopBackup,
}

impl UploadErrorHandler {
    /// Creates a new upload error handler.
    pub fn new(
        folder_repo: Arc<dyn BackupFolderRepository>,
        files: FileService,
        scheduler: Arc<dyn BackupWorkScheduler>,
        stop_backup: StopBackup,
    ) -> Self {
        Self {
            folder_repo,
            files,
            scheduler,
            stop_backup,
        }
    }

    /// Handle one failed upload.
    pub async fn on_error(&self, upload_error: &UploadError) {
        if !has_effect_on_backup(&upload_error.cause) {
            debug!(cause = %upload_error.cause, "Upload failure does not affect backup");
            return;
        }

        let folder_id = upload_error.folder_id();
        match self.folder_repo.has_folders(folder_id).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(folder_id = %folder_id, "Folder not backed up, ignoring upload failure");
                return;
            }
            Err(e) => {
                error!(folder_id = %folder_id, error = %e, "Cannot check backup folders");
                return;
            }
        }

        if let Err(e) = self.scheduler.schedule_notification(folder_id).await {
            error!(folder_id = %folder_id, error = %e, "Cannot schedule backup notification");
        }

        let Some(class) = classify(&upload_error.cause) else {
            return;
        };
        self.handle(folder_id, upload_error, class).await;
    }

    /// Feed every upload failure published on the bus to [`Self::on_error`].
    ///
    /// Runs until the bus is closed or the returned task is aborted.
    pub fn listen(self: Arc<Self>, bus: &EventBus) -> JoinHandle<()> {
        let mut events = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        if let EventPayload::UploadFailed(upload_error) = event.payload {
                            self.on_error(&upload_error).await;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Upload error listener lagged behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("Upload error listener stopped");
        })
    }

    async fn handle(&self, folder_id: FolderId, upload_error: &UploadError, class: FailureClass) {
        let uri_string = upload_error.file.uri_string.as_deref();

        match class {
            FailureClass::NotFound => {
                if let Some(uri_string) = uri_string {
                    debug!(folder_id = %folder_id, uri = uri_string, "Deleting file not found");
                    log_failure(
                        self.files.delete_file(folder_id, uri_string).await,
                        "Cannot delete file",
                        folder_id,
                    );
                }
            }
            FailureClass::Permission
            | FailureClass::LocalStorage
            | FailureClass::DriveStorage
            | FailureClass::PhotosUploadNotAllowed => {
                let Some(error_type) = class.error_type() else {
                    return;
                };
                warn!(
                    folder_id = %folder_id,
                    %error_type,
                    cause = %upload_error.cause,
                    "Backup must stop"
                );
                log_failure(
                    self.stop_backup.execute(folder_id, error_type).await,
                    "Cannot stop backup",
                    folder_id,
                );
            }
            FailureClass::Other => {
                if let Some(uri_string) = uri_string {
                    info!(
                        folder_id = %folder_id,
                        uri = uri_string,
                        cause = %upload_error.cause,
                        "Marking file as failed"
                    );
                    log_failure(
                        self.files.mark_as_failed(folder_id, uri_string).await,
                        "Cannot mark as failed",
                        folder_id,
                    );
                }
            }
            FailureClass::Connectivity | FailureClass::WifiConnectivity => {
                debug!(folder_id = %folder_id, ?class, "Waiting for connectivity");
            }
        }
    }
}

fn log_failure<T>(result: Result<T, AppError>, message: &'static str, folder_id: FolderId) {
    if let Err(e) = result {
        error!(folder_id = %folder_id, error = %e, "{message}");
    }
}
