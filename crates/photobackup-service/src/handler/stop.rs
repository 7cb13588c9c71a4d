//! Stopping a folder's backup after a fatal failure.

use std::sync::Arc;

use tracing::{debug, info, warn};

use photobackup_core::error::AppError;
use photobackup_core::events::BackupStopReason;
use photobackup_core::types::error_type::BackupErrorType;
use photobackup_core::types::id::FolderId;
use photobackup_entity::error::BackupError;
use photobackup_entity::repository::BackupErrorRepository;

use crate::manager::BackupManager;

/// Stops a folder and records why.
///
/// Pending work is kept: the problem notification scheduled for the failure
/// must still run.
#[derive(Clone)]
pub struct StopBackup {
    manager: Arc<BackupManager>,
    error_repo: Arc<dyn BackupErrorRepository>,
}

impl StopBackup {
    /// Creates a new stop use case.
    pub fn new(
        manager: Arc<BackupManager>,
        error_repo: Arc<dyn BackupErrorRepository>,
    ) -> Self {
        Self {
            manager,
            error_repo,
        }
    }

    /// Stop the folder. Returns `false` if it was already stopped, in which
    /// case nothing is recorded. If the error cannot be recorded the folder
    /// is started again and the error returned.
    pub async fn execute(
        &self,
        folder_id: FolderId,
        error_type: BackupErrorType,
    ) -> Result<bool, AppError> {
        if !self
            .manager
            .stop(folder_id, BackupStopReason::Failed(error_type))
        {
            debug!(folder_id = %folder_id, %error_type, "Backup already stopped");
            return Ok(false);
        }

        if let Err(e) = self
            .error_repo
            .insert_error(&BackupError::new(folder_id, error_type))
            .await
        {
            // A stopped folder always has a recorded reason.
            warn!(folder_id = %folder_id, %error_type, error = %e, "Stop not recorded, resuming backup");
            self.manager.start(folder_id);
            return Err(e);
        }

        info!(folder_id = %folder_id, %error_type, "Backup stopped after failure");
        Ok(true)
    }
}
