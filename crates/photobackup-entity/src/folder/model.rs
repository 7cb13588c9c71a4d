//! Folder entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use photobackup_core::types::id::FolderId;

/// Binding between a device bucket and a destination folder.
///
/// A row existing means backup is enabled for the pair; deleting it
/// disables backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BackupFolder {
    /// Source device bucket.
    pub bucket_id: i32,
    /// Destination folder.
    pub folder_id: FolderId,
    /// When the bucket was last scanned for new media.
    pub update_time: Option<DateTime<Utc>>,
}

impl BackupFolder {
    /// Create a binding that has never been scanned.
    pub fn new(bucket_id: i32, folder_id: FolderId) -> Self {
        Self {
            bucket_id,
            folder_id,
            update_time: None,
        }
    }
}

/// A destination folder in remote storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DriveFolder {
    /// Folder identifier.
    pub id: FolderId,
    /// Display name.
    pub name: String,
}

impl DriveFolder {
    /// Create a folder record.
    pub fn new(id: FolderId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
