//! Worker runner: main loop that polls for due jobs and executes them.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Semaphore, watch};
use tokio::time;
use tracing::{error, info, trace, warn};

use photobackup_core::config::WorkerConfig;
use photobackup_entity::job::BackupJob;

use crate::executor::{JobExecutionError, JobExecutor};
use crate::queue::JobQueue;

/// Longest delay between retries of a transiently failing job.
const MAX_RETRY_DELAY_SECONDS: i64 = 300;

/// Main worker runner that polls the queue and executes jobs
#[derive(Debug)]
pub struct WorkerRunner {
    /// Job queue for polling
    queue: Arc<JobQueue>,
    /// Job executor for dispatching
    executor: Arc<JobExecutor>,
    /// Worker configuration
    config: WorkerConfig,
}

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(queue: Arc<JobQueue>, executor: Arc<JobExecutor>, config: WorkerConfig) -> Self {
        Self {
            queue,
            executor,
            config,
        }
    }

    /// Run until the cancel signal turns `true`
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            concurrency = self.config.concurrency,
            poll_interval_ms = self.config.poll_interval_milliseconds,
            "Worker started"
        );

        let concurrency = self.config.concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let poll_interval = Duration::from_millis(self.config.poll_interval_milliseconds);

        loop {
            if *cancel.borrow() {
                break;
            }
            // Drain every due job before sleeping.
            while self.poll_and_execute(&semaphore) {}

            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Worker received shutdown signal");
                        break;
                    }
                }
                _ = time::sleep(poll_interval) => {}
            }
        }

        info!("Worker waiting for in-flight jobs to complete...");
        let permits = u32::try_from(concurrency).unwrap_or(u32::MAX);
        let _ = time::timeout(Duration::from_secs(30), semaphore.acquire_many(permits)).await;
        info!("Worker shut down complete");
    }

    /// Claim and spawn one due job. Returns `false` when no slot or no job
    /// is available.
    fn poll_and_execute(&self, semaphore: &Arc<Semaphore>) -> bool {
        let Ok(permit) = Arc::clone(semaphore).try_acquire_owned() else {
            trace!("All worker slots occupied, waiting...");
            return false;
        };

        let Some(job) = self.queue.dequeue(Utc::now()) else {
            trace!("No jobs due");
            return false;
        };

        let queue = Arc::clone(&self.queue);
        let executor = Arc::clone(&self.executor);
        tokio::spawn(async move {
            let _permit = permit;
            let result = executor.execute(&job).await;
            settle(&queue, &job, result);
        });
        true
    }
}

/// Record the outcome of one execution in the queue.
fn settle(
    queue: &JobQueue,
    job: &BackupJob,
    result: Result<Option<serde_json::Value>, JobExecutionError>,
) {
    match result {
        Ok(output) => {
            queue.complete(job.id);
            info!(job_id = %job.id, output = ?output, "Job completed successfully");
        }
        Err(JobExecutionError::Transient(msg)) if job.can_retry() => {
            let delay = retry_delay(job.attempts);
            warn!(job_id = %job.id, attempts = job.attempts, error = %msg, "Job failed (transient), retrying");
            queue.retry(job.id, Utc::now() + delay);
        }
        Err(JobExecutionError::Transient(msg)) => {
            error!(job_id = %job.id, attempts = job.attempts, error = %msg, "Job failed after all attempts");
            queue.fail(job.id, &msg);
        }
        Err(JobExecutionError::Permanent(msg)) => {
            error!(job_id = %job.id, error = %msg, "Job failed permanently");
            queue.fail(job.id, &msg);
        }
        Err(JobExecutionError::Internal(err)) => {
            let msg = err.to_string();
            error!(job_id = %job.id, error = %msg, "Job internal error");
            queue.fail(job.id, &msg);
        }
    }
}

/// Exponential backoff: 2, 4, 8, ... seconds, capped.
fn retry_delay(attempts: u32) -> chrono::Duration {
    let seconds = 2_i64
        .checked_pow(attempts.min(16))
        .unwrap_or(MAX_RETRY_DELAY_SECONDS)
        .min(MAX_RETRY_DELAY_SECONDS);
    chrono::Duration::seconds(seconds)
}

#[cfg(test)]
mod tests {
    use photobackup_entity::job::BackupJobKind;

    use super::*;

    #[test]
    fn test_retry_delay_is_capped() {
        assert_eq!(retry_delay(1), chrono::Duration::seconds(2));
        assert_eq!(retry_delay(3), chrono::Duration::seconds(8));
        assert_eq!(
            retry_delay(30),
            chrono::Duration::seconds(MAX_RETRY_DELAY_SECONDS)
        );
    }

    #[test]
    fn test_transient_failure_is_retried_until_exhausted() {
        let queue = JobQueue::new();
        queue.enqueue(BackupJobKind::ErrorHistoryPrune, Utc::now(), 2);

        let job = queue.dequeue(Utc::now()).unwrap();
        settle(&queue, &job, Err(JobExecutionError::Transient("db".into())));
        assert_eq!(queue.stats().pending, 1);

        let later = Utc::now() + chrono::Duration::seconds(MAX_RETRY_DELAY_SECONDS);
        let job = queue.dequeue(later).unwrap();
        settle(&queue, &job, Err(JobExecutionError::Transient("db".into())));
        let stats = queue.stats();
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.failed, 1);
    }
}
