//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use chrono::Utc;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{debug, info};

use photobackup_core::error::AppError;
use photobackup_entity::job::BackupJobKind;

use crate::queue::JobQueue;

/// Hourly, on the hour.
const ERROR_PRUNE_SCHEDULE: &str = "0 0 * * * *";

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Job queue for enqueuing scheduled work
    queue: Arc<JobQueue>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(queue: Arc<JobQueue>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::scheduling(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler, queue })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_error_prune().await?;

        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::scheduling(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::scheduling(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }

    /// Error history prune, every hour
    async fn register_error_prune(&self) -> Result<(), AppError> {
        let queue = Arc::clone(&self.queue);
        let job = CronJob::new_async(ERROR_PRUNE_SCHEDULE, move |_uuid, _lock| {
            let queue = Arc::clone(&queue);
            Box::pin(async move {
                debug!("Scheduling error history prune job");
                queue.enqueue(BackupJobKind::ErrorHistoryPrune, Utc::now(), 1);
            })
        })
        .map_err(|e| {
            AppError::scheduling(format!("Failed to create error_history_prune schedule: {e}"))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::scheduling(format!("Failed to add error_history_prune schedule: {e}"))
        })?;

        info!("Registered: error_history_prune (every hour)");
        Ok(())
    }
}
