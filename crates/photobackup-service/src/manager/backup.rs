//! Per-folder backup run state.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info};

use photobackup_core::events::{BackupEvent, BackupStopReason, EventBus};
use photobackup_core::result::AppResult;
use photobackup_core::types::id::FolderId;
use photobackup_entity::repository::BackupFolderRepository;

/// Whether a folder's backup is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupRunState {
    /// Uploads may proceed.
    Running,
    /// Uploads are halted until backup is started again.
    Stopped,
}

/// Tracks which folders are running and announces transitions.
///
/// A folder with no recorded state is treated as running: folders restored
/// from storage are started lazily, so the first stop after start-up must
/// still take effect.
pub struct BackupManager {
    /// Run state per folder. Updated under the map's shard lock.
    states: DashMap<FolderId, BackupRunState>,
    /// Source of truth for whether backup is enabled.
    folder_repo: Arc<dyn BackupFolderRepository>,
    /// Lifecycle announcements.
    events: EventBus,
}

impl BackupManager {
    /// Creates a new backup manager.
    pub fn new(folder_repo: Arc<dyn BackupFolderRepository>, events: EventBus) -> Self {
        Self {
            states: DashMap::new(),
            folder_repo,
            events,
        }
    }

    /// Mark every persisted folder as running.
    pub async fn restore(&self) -> AppResult<usize> {
        let folders = self.folder_repo.get_all_folders().await?;
        let mut restored = 0;
        for folder in folders {
            if self.start(folder.folder_id) {
                restored += 1;
            }
        }
        info!(folders = restored, "Restored backup run state");
        Ok(restored)
    }

    /// Start a folder's backup. Returns `true` only if it was not running.
    pub fn start(&self, folder_id: FolderId) -> bool {
        let changed = {
            let mut state = self.states.entry(folder_id).or_insert(BackupRunState::Stopped);
            let changed = *state != BackupRunState::Running;
            *state = BackupRunState::Running;
            changed
        };

        if changed {
            info!(folder_id = %folder_id, "Backup started");
            self.events.publish(BackupEvent::Started { folder_id });
        } else {
            debug!(folder_id = %folder_id, "Backup already running");
        }
        changed
    }

    /// Stop a folder's backup. Returns `true` only if it was running.
    ///
    /// Concurrent calls for the same folder have exactly one winner.
    pub fn stop(&self, folder_id: FolderId, reason: BackupStopReason) -> bool {
        let changed = {
            let mut state = self.states.entry(folder_id).or_insert(BackupRunState::Running);
            let changed = *state != BackupRunState::Stopped;
            *state = BackupRunState::Stopped;
            changed
        };

        if changed {
            info!(folder_id = %folder_id, reason = ?reason, "Backup stopped");
            self.events.publish(BackupEvent::Stopped { folder_id, reason });
        } else {
            debug!(folder_id = %folder_id, "Backup already stopped");
        }
        changed
    }

    /// Recorded run state of a folder, if any.
    pub fn run_state(&self, folder_id: FolderId) -> Option<BackupRunState> {
        self.states.get(&folder_id).map(|state| *state)
    }

    /// Whether the folder is running: enabled and not stopped.
    pub async fn is_running(&self, folder_id: FolderId) -> AppResult<bool> {
        if self.run_state(folder_id) == Some(BackupRunState::Stopped) {
            return Ok(false);
        }
        self.is_enabled(folder_id).await
    }

    /// Whether backup is enabled for the folder.
    pub async fn is_enabled(&self, folder_id: FolderId) -> AppResult<bool> {
        self.folder_repo.has_folders(folder_id).await
    }
}

impl fmt::Debug for BackupManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackupManager")
            .field("folders", &self.states.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use photobackup_core::observe::QueryObservable;
    use photobackup_core::types::error_type::BackupErrorType;
    use photobackup_entity::folder::BackupFolder;

    use super::*;

    struct NoFolders;

    #[async_trait]
    impl BackupFolderRepository for NoFolders {
        async fn insert_folder(&self, _folder: &BackupFolder) -> AppResult<()> {
            Ok(())
        }
        async fn delete_folders(&self, _folder_id: FolderId) -> AppResult<u64> {
            Ok(0)
        }
        async fn get_all(&self, _folder_id: FolderId) -> AppResult<Vec<BackupFolder>> {
            Ok(Vec::new())
        }
        async fn get_all_folders(&self) -> AppResult<Vec<BackupFolder>> {
            Ok(Vec::new())
        }
        async fn has_folders(&self, _folder_id: FolderId) -> AppResult<bool> {
            Ok(false)
        }
        fn observe_has_folders(&self, _folder_id: FolderId) -> QueryObservable<bool> {
            Box::pin(futures::stream::once(async { Ok(false) }))
        }
    }

    #[tokio::test]
    async fn test_start_and_stop_report_transitions() {
        let bus = EventBus::new();
        let mut events = bus.subscribe();
        let manager = BackupManager::new(Arc::new(NoFolders), bus);
        let folder_id = FolderId::new();
        let reason = BackupStopReason::Failed(BackupErrorType::DriveStorage);

        assert!(manager.start(folder_id));
        assert!(!manager.start(folder_id));
        assert!(manager.stop(folder_id, reason));
        assert!(!manager.stop(folder_id, reason));
        assert_eq!(manager.run_state(folder_id), Some(BackupRunState::Stopped));

        let mut announced = Vec::new();
        while let Ok(event) = events.try_recv() {
            announced.push(event.payload);
        }
        assert_eq!(announced.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_folder_stops_once() {
        let manager = BackupManager::new(Arc::new(NoFolders), EventBus::new());
        let folder_id = FolderId::new();

        assert!(manager.stop(folder_id, BackupStopReason::Disabled));
        assert!(!manager.stop(folder_id, BackupStopReason::Disabled));
        assert!(!manager.is_running(folder_id).await.unwrap());
    }
}
