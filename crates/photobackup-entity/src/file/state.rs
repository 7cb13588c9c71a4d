//! Backup file lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a [`super::BackupFile`].
///
/// Files move forward from `Idle` and end at `Completed` or `Failed`;
/// `Duplicate` marks content already present remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackupFileState {
    /// Discovered, not yet queued.
    Idle,
    /// Queued for upload.
    Enqueued,
    /// Prepared and ready to upload.
    Ready,
    /// Content already exists remotely.
    Duplicate,
    /// Upload failed for this file only.
    Failed,
    /// Uploaded.
    Completed,
}

impl BackupFileState {
    /// States that still need work.
    pub const PENDING: [BackupFileState; 3] = [Self::Idle, Self::Enqueued, Self::Ready];

    /// Whether the file still needs uploading.
    pub fn is_pending(&self) -> bool {
        Self::PENDING.contains(self)
    }

    /// Whether the state is final.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Return the state as an upper-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Enqueued => "ENQUEUED",
            Self::Ready => "READY",
            Self::Duplicate => "DUPLICATE",
            Self::Failed => "FAILED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for BackupFileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
