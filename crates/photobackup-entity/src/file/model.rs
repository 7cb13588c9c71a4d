//! Backup file entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use photobackup_core::types::id::FolderId;

use super::state::BackupFileState;

/// A local media item targeted for backup.
///
/// Unique per `(folder_id, uri_string)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BackupFile {
    /// Source device bucket.
    pub bucket_id: i32,
    /// Destination folder.
    pub folder_id: FolderId,
    /// On-device locator of the media item.
    pub uri_string: String,
    /// MIME type of the media item.
    pub mime_type: String,
    /// File name.
    pub name: String,
    /// Content hash used for duplicate detection.
    pub hash: String,
    /// Size in bytes.
    pub size: i64,
    /// Lifecycle state.
    pub state: BackupFileState,
    /// Capture date.
    pub date: DateTime<Utc>,
}

impl BackupFile {
    /// Whether the file still needs uploading.
    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }
}
