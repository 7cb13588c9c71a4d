//! Backup problem notifications.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use photobackup_core::events::{BackupEvent, EventBus};
use photobackup_entity::job::BackupJob;
use photobackup_service::{FolderService, GetErrors};

use crate::executor::{JobExecutionError, JobHandler};

/// Announces the problems affecting a folder's backup.
///
/// Publishes [`BackupEvent::ProblemReported`] with the folder's current
/// errors. Nothing is announced when the folder has no errors or is no
/// longer backed up.
#[derive(Clone)]
pub struct BackupNotificationJobHandler {
    folders: FolderService,
    errors: GetErrors,
    events: EventBus,
}

impl BackupNotificationJobHandler {
    /// Create a new notification job handler
    pub fn new(folders: FolderService, errors: GetErrors, events: EventBus) -> Self {
        Self {
            folders,
            errors,
            events,
        }
    }
}

impl std::fmt::Debug for BackupNotificationJobHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupNotificationJobHandler").finish()
    }
}

#[async_trait]
impl JobHandler for BackupNotificationJobHandler {
    fn job_type(&self) -> &str {
        "backup_notification"
    }

    async fn execute(&self, job: &BackupJob) -> Result<Option<Value>, JobExecutionError> {
        let folder_id = job.kind.folder_id().ok_or_else(|| {
            JobExecutionError::Permanent("Notification job without folder".to_string())
        })?;

        let enabled = self
            .folders
            .has_folders(folder_id)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Folder lookup failed: {e}")))?;
        if !enabled {
            debug!(folder_id = %folder_id, "Folder no longer backed up, nothing to notify");
            return Ok(None);
        }

        let errors = self
            .errors
            .execute(folder_id)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Error lookup failed: {e}")))?;
        if errors.is_empty() {
            debug!(folder_id = %folder_id, "No backup problems to notify");
            return Ok(None);
        }

        info!(folder_id = %folder_id, errors = ?errors, "Notifying backup problems");
        self.events.publish(BackupEvent::ProblemReported {
            folder_id,
            errors: errors.clone(),
        });

        Ok(Some(serde_json::json!({
            "folder_id": folder_id,
            "errors": errors,
        })))
    }
}
