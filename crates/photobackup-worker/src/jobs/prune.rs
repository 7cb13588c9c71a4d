//! Error history pruning.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;
use tracing::info;

use photobackup_entity::job::BackupJob;
use photobackup_entity::repository::BackupErrorRepository;

use crate::executor::{JobExecutionError, JobHandler};

/// Deletes backup errors older than the retention period.
pub struct ErrorPruneJobHandler {
    /// Error history
    error_repo: Arc<dyn BackupErrorRepository>,
    /// How long errors are kept
    retention: Duration,
}

impl ErrorPruneJobHandler {
    /// Create a new prune job handler
    pub fn new(error_repo: Arc<dyn BackupErrorRepository>, retention_days: u32) -> Self {
        Self {
            error_repo,
            retention: Duration::days(i64::from(retention_days)),
        }
    }
}

impl std::fmt::Debug for ErrorPruneJobHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorPruneJobHandler")
            .field("retention", &self.retention)
            .finish()
    }
}

#[async_trait]
impl JobHandler for ErrorPruneJobHandler {
    fn job_type(&self) -> &str {
        "error_history_prune"
    }

    async fn execute(&self, _job: &BackupJob) -> Result<Option<Value>, JobExecutionError> {
        let cutoff = Utc::now() - self.retention;
        let removed = self
            .error_repo
            .delete_older_than(cutoff)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Error prune failed: {e}")))?;

        info!(removed, cutoff = %cutoff, "Pruned backup error history");

        Ok(Some(serde_json::json!({
            "task": "error_history_prune",
            "errors_removed": removed,
        })))
    }
}
