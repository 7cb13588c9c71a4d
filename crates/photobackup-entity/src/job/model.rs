//! Job entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use photobackup_core::types::id::{FolderId, JobId};

use super::status::JobStatus;

/// What a job does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackupJobKind {
    /// Tell the user about problems with a folder's backup.
    BackupNotification {
        /// The folder.
        folder_id: FolderId,
    },
    /// Drop backup errors older than the retention period.
    ErrorHistoryPrune,
}

impl BackupJobKind {
    /// Job type identifier used to pick a handler.
    pub fn job_type(&self) -> &'static str {
        match self {
            Self::BackupNotification { .. } => "backup_notification",
            Self::ErrorHistoryPrune => "error_history_prune",
        }
    }

    /// The folder the job belongs to, if any.
    pub fn folder_id(&self) -> Option<FolderId> {
        match self {
            Self::BackupNotification { folder_id } => Some(*folder_id),
            Self::ErrorHistoryPrune => None,
        }
    }
}

/// A background job held by the worker queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupJob {
    /// Unique job identifier.
    pub id: JobId,
    /// What the job does.
    pub kind: BackupJobKind,
    /// Current job status.
    pub status: JobStatus,
    /// Number of execution attempts so far.
    pub attempts: u32,
    /// Maximum allowed attempts.
    pub max_attempts: u32,
    /// Earliest time the job may run.
    pub scheduled_at: DateTime<Utc>,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
}

impl BackupJob {
    /// Create a pending job runnable from `scheduled_at`.
    pub fn new(kind: BackupJobKind, scheduled_at: DateTime<Utc>, max_attempts: u32) -> Self {
        Self {
            id: JobId::new(),
            kind,
            status: JobStatus::Pending,
            attempts: 0,
            max_attempts: max_attempts.max(1),
            scheduled_at,
            created_at: Utc::now(),
        }
    }

    /// Whether the job may run at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Pending && self.scheduled_at <= now
    }

    /// Whether another attempt is allowed after a transient failure.
    pub fn can_retry(&self) -> bool {
        self.attempts < self.max_attempts
    }
}
