//! In-memory job queue for deferred backup work.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use photobackup_core::types::id::{FolderId, JobId};
use photobackup_entity::job::{BackupJob, BackupJobKind, JobStatus};

/// Job queue for enqueuing and dequeuing work.
///
/// Finished jobs leave the queue; only pending and running jobs are held.
#[derive(Debug, Default)]
pub struct JobQueue {
    /// Pending and running jobs.
    jobs: Mutex<Vec<BackupJob>>,
    /// Jobs that exhausted their attempts or failed permanently.
    failed: Mutex<u64>,
}

impl JobQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a job runnable from `scheduled_at`.
    pub fn enqueue(
        &self,
        kind: BackupJobKind,
        scheduled_at: DateTime<Utc>,
        max_attempts: u32,
    ) -> BackupJob {
        let job = BackupJob::new(kind, scheduled_at, max_attempts);
        self.lock().push(job.clone());
        debug!(
            job_id = %job.id,
            job_type = job.kind.job_type(),
            scheduled_at = %job.scheduled_at,
            "Enqueued job"
        );
        job
    }

    /// Claim the earliest due job, marking it running.
    pub fn dequeue(&self, now: DateTime<Utc>) -> Option<BackupJob> {
        let mut jobs = self.lock();
        let job = jobs
            .iter_mut()
            .filter(|job| job.is_due(now))
            .min_by_key(|job| job.scheduled_at)?;
        job.status = JobStatus::Running;
        job.attempts += 1;
        debug!(job_id = %job.id, job_type = job.kind.job_type(), "Dequeued job");
        Some(job.clone())
    }

    /// Drop a job that finished successfully.
    pub fn complete(&self, job_id: JobId) {
        self.lock().retain(|job| job.id != job_id);
        debug!(job_id = %job_id, "Job completed");
    }

    /// Drop a job that will not run again.
    pub fn fail(&self, job_id: JobId, error: &str) {
        let removed = {
            let mut jobs = self.lock();
            let before = jobs.len();
            jobs.retain(|job| job.id != job_id);
            before != jobs.len()
        };
        if removed {
            *self.failed.lock().unwrap_or_else(|p| p.into_inner()) += 1;
        }
        debug!(job_id = %job_id, error, "Job failed");
    }

    /// Put a running job back in the queue to run again at `at`.
    ///
    /// Returns `false` if the job was cancelled meanwhile.
    pub fn retry(&self, job_id: JobId, at: DateTime<Utc>) -> bool {
        let mut jobs = self.lock();
        let Some(job) = jobs.iter_mut().find(|job| job.id == job_id) else {
            return false;
        };
        job.status = JobStatus::Pending;
        job.scheduled_at = at;
        debug!(job_id = %job_id, attempts = job.attempts, retry_at = %at, "Job retried");
        true
    }

    /// Whether the job is still waiting to run.
    pub fn is_pending(&self, job_id: JobId) -> bool {
        self.lock()
            .iter()
            .any(|job| job.id == job_id && job.status == JobStatus::Pending)
    }

    /// Remove every pending job of a folder. Running jobs finish.
    pub fn cancel_folder(&self, folder_id: FolderId) -> u64 {
        let mut jobs = self.lock();
        let before = jobs.len();
        jobs.retain(|job| {
            job.status != JobStatus::Pending || job.kind.folder_id() != Some(folder_id)
        });
        let cancelled = (before - jobs.len()) as u64;
        if cancelled > 0 {
            debug!(folder_id = %folder_id, cancelled, "Cancelled folder jobs");
        }
        cancelled
    }

    /// Get queue statistics.
    pub fn stats(&self) -> QueueStats {
        let jobs = self.lock();
        let count = |status| jobs.iter().filter(|job| job.status == status).count() as u64;
        QueueStats {
            pending: count(JobStatus::Pending),
            running: count(JobStatus::Running),
            failed: *self.failed.lock().unwrap_or_else(|p| p.into_inner()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<BackupJob>> {
        self.jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Queue statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Jobs waiting to run.
    pub pending: u64,
    /// Jobs being executed.
    pub running: u64,
    /// Jobs dropped after failing.
    pub failed: u64,
}
