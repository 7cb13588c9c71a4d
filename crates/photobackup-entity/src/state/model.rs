//! Backup state and status.

use serde::{Deserialize, Serialize};

use photobackup_core::types::error_type::BackupErrorType;

use super::counts::BackupFileCounts;

/// Aggregate progress of a folder's backup.
///
/// Computed from file counts on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BackupStatus {
    /// Nothing left to upload.
    Complete {
        /// Tracked files.
        total_backup_photos: u32,
    },
    /// Uploads are still pending.
    InProgress {
        /// Tracked files.
        total_backup_photos: u32,
        /// Files in `Idle`, `Enqueued`, or `Ready`.
        pending_backup_photos: u32,
    },
    /// At least one file failed.
    Uncompleted {
        /// Tracked files.
        total_backup_photos: u32,
        /// Files in `Failed`.
        failed_backup_photos: u32,
    },
}

impl BackupStatus {
    /// Derive the status from file counts.
    ///
    /// Failures win over pending work, which wins over completion.
    pub fn from_counts(counts: BackupFileCounts) -> Self {
        let total = clamp(counts.total);
        let failed = clamp(counts.failed);
        let pending = clamp(counts.pending);

        if failed > 0 {
            Self::Uncompleted {
                total_backup_photos: total,
                failed_backup_photos: failed,
            }
        } else if pending > 0 {
            Self::InProgress {
                total_backup_photos: total,
                pending_backup_photos: pending,
            }
        } else {
            Self::Complete {
                total_backup_photos: total,
            }
        }
    }

    /// Tracked files.
    pub fn total_backup_photos(&self) -> u32 {
        match self {
            Self::Complete {
                total_backup_photos,
            }
            | Self::InProgress {
                total_backup_photos,
                ..
            }
            | Self::Uncompleted {
                total_backup_photos,
                ..
            } => *total_backup_photos,
        }
    }
}

fn clamp(count: i64) -> u32 {
    u32::try_from(count.max(0)).unwrap_or(u32::MAX)
}

/// Everything the presentation layer needs to render a folder's backup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackupState {
    /// A bucket binding exists for the folder.
    pub is_backup_enabled: bool,
    /// The destination folder exists and the default bucket is available.
    pub has_default_folder: bool,
    /// Progress; `None` while backup is disabled.
    pub backup_status: Option<BackupStatus>,
    /// Conditions currently blocking the backup, sorted and unique; empty
    /// while backup is disabled.
    pub errors: Vec<BackupErrorType>,
}

impl BackupState {
    /// State of a folder without backup.
    pub fn disabled(has_default_folder: bool) -> Self {
        Self {
            is_backup_enabled: false,
            has_default_folder,
            backup_status: None,
            errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::BackupFileState;

    fn status_of(states: &[BackupFileState]) -> BackupStatus {
        BackupStatus::from_counts(BackupFileCounts::from_states(states.iter().copied()))
    }

    #[test]
    fn test_no_files_is_complete() {
        assert_eq!(
            status_of(&[]),
            BackupStatus::Complete {
                total_backup_photos: 0
            }
        );
    }

    #[test]
    fn test_pending_is_in_progress() {
        use BackupFileState::*;
        assert_eq!(
            status_of(&[Completed, Idle, Enqueued, Ready, Duplicate]),
            BackupStatus::InProgress {
                total_backup_photos: 5,
                pending_backup_photos: 3,
            }
        );
    }

    #[test]
    fn test_failure_wins_over_pending() {
        use BackupFileState::*;
        assert_eq!(
            status_of(&[Failed, Idle, Idle]),
            BackupStatus::Uncompleted {
                total_backup_photos: 3,
                failed_backup_photos: 1,
            }
        );
    }

    #[test]
    fn test_all_done_is_complete() {
        use BackupFileState::*;
        let status = status_of(&[Completed, Duplicate, Completed]);
        assert_eq!(
            status,
            BackupStatus::Complete {
                total_backup_photos: 3
            }
        );
        assert_eq!(status.total_backup_photos(), 3);
    }

    #[test]
    fn test_negative_counts_clamp_to_zero() {
        let counts = BackupFileCounts {
            total: -1,
            pending: 0,
            failed: 0,
        };
        assert_eq!(
            BackupStatus::from_counts(counts),
            BackupStatus::Complete {
                total_backup_photos: 0
            }
        );
    }
}
