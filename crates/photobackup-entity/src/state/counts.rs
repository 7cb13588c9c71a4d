//! Per-state file counts for a folder.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::file::BackupFileState;

/// How many of a folder's files are in each bucket of states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BackupFileCounts {
    /// Every tracked file.
    pub total: i64,
    /// Files in `Idle`, `Enqueued`, or `Ready`.
    pub pending: i64,
    /// Files in `Failed`.
    pub failed: i64,
}

impl BackupFileCounts {
    /// Count a set of states.
    pub fn from_states<I>(states: I) -> Self
    where
        I: IntoIterator<Item = BackupFileState>,
    {
        states.into_iter().fold(Self::default(), |mut counts, state| {
            counts.total += 1;
            if state.is_pending() {
                counts.pending += 1;
            }
            if state == BackupFileState::Failed {
                counts.failed += 1;
            }
            counts
        })
    }
}
