//! Work-scheduling collaborator used to surface backup problems.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::FolderId;

/// Schedules deferred backup work outside the caller's task.
///
/// Implementations are fire-and-forget: a successful return only means the
/// request was accepted, and duplicate requests for the same folder may be
/// coalesced.
#[async_trait]
pub trait BackupWorkScheduler: Send + Sync + 'static {
    /// Ask for the user to be told about a problem with a folder's backup.
    async fn schedule_notification(&self, folder_id: FolderId) -> AppResult<()>;

    /// Drop all pending work for a folder. Returns how many jobs were removed.
    async fn cancel_folder_work(&self, folder_id: FolderId) -> AppResult<u64>;
}
