//! Work-scheduling collaborator backed by the in-memory job queue.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use tracing::debug;

use photobackup_core::config::WorkerConfig;
use photobackup_core::result::AppResult;
use photobackup_core::traits::BackupWorkScheduler;
use photobackup_core::types::id::{FolderId, JobId};
use photobackup_entity::job::BackupJobKind;

use crate::queue::JobQueue;

/// Schedules delayed backup notifications.
///
/// Requests for the same folder within the coalesce window share one job
/// while that job is still pending.
#[derive(Debug, Clone)]
pub struct WorkerScheduler {
    /// Queue receiving the jobs.
    queue: Arc<JobQueue>,
    /// Folder -> job scheduled for it within the coalesce window.
    recent: Cache<FolderId, JobId>,
    /// Delay before a notification runs.
    delay: chrono::Duration,
    /// Attempts allowed per notification job.
    max_attempts: u32,
}

impl WorkerScheduler {
    /// Create a scheduler feeding `queue`.
    pub fn new(queue: Arc<JobQueue>, config: &WorkerConfig) -> Self {
        let recent = Cache::builder()
            .time_to_live(Duration::from_secs(config.coalesce_window_seconds))
            .build();

        Self {
            queue,
            recent,
            delay: chrono::Duration::from_std(Duration::from_secs(
                config.notification_delay_seconds,
            ))
            .unwrap_or(chrono::Duration::MAX),
            max_attempts: config.max_attempts,
        }
    }
}

#[async_trait]
impl BackupWorkScheduler for WorkerScheduler {
    async fn schedule_notification(&self, folder_id: FolderId) -> AppResult<()> {
        let queue = Arc::clone(&self.queue);
        let scheduled_at = Utc::now() + self.delay;
        let max_attempts = self.max_attempts;

        let result = self
            .recent
            .entry(folder_id)
            .and_compute_with(|current| {
                let op = match current.map(|entry| entry.into_value()) {
                    Some(job_id) if queue.is_pending(job_id) => Op::Nop,
                    _ => Op::Put(
                        queue
                            .enqueue(
                                BackupJobKind::BackupNotification { folder_id },
                                scheduled_at,
                                max_attempts,
                            )
                            .id,
                    ),
                };
                std::future::ready(op)
            })
            .await;

        if let CompResult::Unchanged(entry) = result {
            debug!(folder_id = %folder_id, job_id = %entry.value(), "Notification coalesced");
        }
        Ok(())
    }

    async fn cancel_folder_work(&self, folder_id: FolderId) -> AppResult<u64> {
        self.recent.invalidate(&folder_id).await;
        Ok(self.queue.cancel_folder(folder_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(coalesce_window_seconds: u64) -> WorkerConfig {
        WorkerConfig {
            notification_delay_seconds: 0,
            coalesce_window_seconds,
            ..WorkerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_requests_within_window_share_a_job() {
        let queue = Arc::new(JobQueue::new());
        let scheduler = WorkerScheduler::new(Arc::clone(&queue), &config(60));
        let folder_id = FolderId::new();

        scheduler.schedule_notification(folder_id).await.unwrap();
        scheduler.schedule_notification(folder_id).await.unwrap();
        scheduler.schedule_notification(FolderId::new()).await.unwrap();

        assert_eq!(queue.stats().pending, 2);
    }

    #[tokio::test]
    async fn test_request_after_job_ran_schedules_again() {
        let queue = Arc::new(JobQueue::new());
        let scheduler = WorkerScheduler::new(Arc::clone(&queue), &config(60));
        let folder_id = FolderId::new();

        scheduler.schedule_notification(folder_id).await.unwrap();
        let job = queue.dequeue(Utc::now()).unwrap();
        scheduler.schedule_notification(folder_id).await.unwrap();
        assert_eq!(queue.stats().pending, 1);

        queue.complete(job.id);
        scheduler.schedule_notification(folder_id).await.unwrap();
        assert_eq!(queue.stats().pending, 1);
        let job = queue.dequeue(Utc::now()).unwrap();
        queue.complete(job.id);

        scheduler.schedule_notification(folder_id).await.unwrap();
        assert_eq!(queue.stats().pending, 1);
    }

    #[tokio::test]
    async fn test_cancel_resets_coalescing() {
        let queue = Arc::new(JobQueue::new());
        let scheduler = WorkerScheduler::new(Arc::clone(&queue), &config(60));
        let folder_id = FolderId::new();

        scheduler.schedule_notification(folder_id).await.unwrap();
        assert_eq!(scheduler.cancel_folder_work(folder_id).await.unwrap(), 1);
        assert_eq!(queue.stats().pending, 0);

        scheduler.schedule_notification(folder_id).await.unwrap();
        assert_eq!(queue.stats().pending, 1);
    }
}
