//! Job executor that dispatches jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use photobackup_core::error::AppError;
use photobackup_entity::job::BackupJob;

/// Trait for job handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// Get the job type this handler processes
    fn job_type(&self) -> &str;

    /// Execute the job
    async fn execute(&self, job: &BackupJob) -> Result<Option<Value>, JobExecutionError>;
}

/// Error from job execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure, do not retry
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure, may retry
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

/// Dispatches jobs to the appropriate handler based on job type
#[derive(Debug, Default)]
pub struct JobExecutor {
    /// Registered job handlers by type
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create a new job executor
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        info!(job_type = %job_type, "Registered job handler");
        self.handlers.insert(job_type, handler);
    }

    /// Execute a job by dispatching to the correct handler
    pub async fn execute(&self, job: &BackupJob) -> Result<Option<Value>, JobExecutionError> {
        let job_type = job.kind.job_type();
        let handler = self.handlers.get(job_type).ok_or_else(|| {
            JobExecutionError::Permanent(format!(
                "No handler registered for job type '{job_type}'"
            ))
        })?;

        info!(
            job_id = %job.id,
            job_type,
            attempt = job.attempts,
            max_attempts = job.max_attempts,
            "Executing job"
        );

        handler.execute(job).await
    }

    /// Check if a handler is registered for a job type
    pub fn has_handler(&self, job_type: &str) -> bool {
        self.handlers.contains_key(job_type)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use photobackup_entity::job::BackupJobKind;

    use super::*;

    #[derive(Debug)]
    struct Echo;

    #[async_trait]
    impl JobHandler for Echo {
        fn job_type(&self) -> &str {
            "error_history_prune"
        }

        async fn execute(&self, _job: &BackupJob) -> Result<Option<Value>, JobExecutionError> {
            Ok(Some(serde_json::json!({"ok": true})))
        }
    }

    #[tokio::test]
    async fn test_dispatch_by_job_type() {
        let mut executor = JobExecutor::new();
        executor.register(Arc::new(Echo));
        assert!(executor.has_handler("error_history_prune"));

        let prune = BackupJob::new(BackupJobKind::ErrorHistoryPrune, Utc::now(), 1);
        assert!(executor.execute(&prune).await.unwrap().is_some());

        let notify = BackupJob::new(
            BackupJobKind::BackupNotification {
                folder_id: Default::default(),
            },
            Utc::now(),
            1,
        );
        assert!(matches!(
            executor.execute(&notify).await,
            Err(JobExecutionError::Permanent(_))
        ));
    }
}
