//! Backup error entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use photobackup_core::types::error_type::BackupErrorType;
use photobackup_core::types::id::FolderId;

/// A classified failure recorded against a folder.
///
/// At most one row per `(folder_id, error_type)`; recording the same type
/// again refreshes `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BackupError {
    /// Folder the error applies to.
    pub folder_id: FolderId,
    /// Error classification.
    pub error_type: BackupErrorType,
    /// Whether the backup may recover without user action.
    pub retryable: bool,
    /// When the error was (last) recorded.
    pub created_at: DateTime<Utc>,
}

impl BackupError {
    /// Create an error of the given type, stamped now.
    pub fn new(folder_id: FolderId, error_type: BackupErrorType) -> Self {
        Self {
            folder_id,
            error_type,
            retryable: error_type.is_retryable(),
            created_at: Utc::now(),
        }
    }
}
