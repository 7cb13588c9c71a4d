//! Events emitted by the upload pipeline.

use serde::{Deserialize, Serialize};

use crate::types::failure::UploadFailure;
use crate::types::id::FolderId;

/// The upload record a failure refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFileLink {
    /// Upload pipeline's own identifier for the attempt.
    pub id: i64,
    /// Destination folder of the upload.
    pub parent_folder_id: FolderId,
    /// On-device locator of the source file, when the upload came from one.
    pub uri_string: Option<String>,
    /// Display name of the file.
    pub name: String,
}

/// One failed upload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadError {
    /// The upload that failed.
    pub file: UploadFileLink,
    /// Why it failed.
    pub cause: UploadFailure,
}

impl UploadError {
    /// Create a new upload error event.
    pub fn new(file: UploadFileLink, cause: UploadFailure) -> Self {
        Self { file, cause }
    }

    /// The destination folder of the failed upload.
    pub fn folder_id(&self) -> FolderId {
        self.file.parent_folder_id
    }
}
