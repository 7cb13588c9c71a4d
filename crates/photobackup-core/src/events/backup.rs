//! Backup lifecycle announcements.

use serde::{Deserialize, Serialize};

use crate::types::error_type::BackupErrorType;
use crate::types::id::FolderId;

/// Events related to a folder's backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BackupEvent {
    /// Backup was enabled for a folder.
    Enabled {
        /// The folder.
        folder_id: FolderId,
    },
    /// Backup was disabled for a folder.
    Disabled {
        /// The folder.
        folder_id: FolderId,
    },
    /// The folder's backup started running.
    Started {
        /// The folder.
        folder_id: FolderId,
    },
    /// The folder's backup stopped.
    Stopped {
        /// The folder.
        folder_id: FolderId,
        /// Why it stopped.
        reason: BackupStopReason,
    },
    /// Problems were reported to the user for a folder.
    ProblemReported {
        /// The folder.
        folder_id: FolderId,
        /// The error types shown.
        errors: Vec<BackupErrorType>,
    },
}

impl BackupEvent {
    /// The folder the event is about.
    pub fn folder_id(&self) -> FolderId {
        match self {
            Self::Enabled { folder_id }
            | Self::Disabled { folder_id }
            | Self::Started { folder_id }
            | Self::Stopped { folder_id, .. }
            | Self::ProblemReported { folder_id, .. } => *folder_id,
        }
    }
}

/// Why a folder's backup stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "error", rename_all = "snake_case")]
pub enum BackupStopReason {
    /// The user disabled backup.
    Disabled,
    /// A folder-fatal failure was recorded.
    Failed(BackupErrorType),
}
