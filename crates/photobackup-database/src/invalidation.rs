//! Table-level change notifications.
//!
//! Repositories call [`InvalidationTracker::invalidate`] after every write
//! that changed at least one row. Observable queries subscribe to the
//! tables they read and re-run whenever one of them is invalidated.

use std::collections::HashMap;
use std::future::Future;

use futures::StreamExt;
use tokio::sync::watch;
use tracing::trace;

use photobackup_core::observe::QueryObservable;
use photobackup_core::result::AppResult;

/// Tables whose changes can be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// `backup_folders`
    BackupFolders,
    /// `backup_files`
    BackupFiles,
    /// `backup_errors`
    BackupErrors,
    /// `backup_configurations`
    BackupConfigurations,
    /// `drive_folders`
    DriveFolders,
}

impl Table {
    /// Every observable table.
    pub const ALL: [Table; 5] = [
        Self::BackupFolders,
        Self::BackupFiles,
        Self::BackupErrors,
        Self::BackupConfigurations,
        Self::DriveFolders,
    ];

    /// SQL table name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BackupFolders => "backup_folders",
            Self::BackupFiles => "backup_files",
            Self::BackupErrors => "backup_errors",
            Self::BackupConfigurations => "backup_configurations",
            Self::DriveFolders => "drive_folders",
        }
    }
}

/// One version counter per table.
#[derive(Debug)]
pub struct InvalidationTracker {
    versions: HashMap<Table, watch::Sender<u64>>,
}

impl InvalidationTracker {
    /// Create a tracker with every table at version zero.
    pub fn new() -> Self {
        let versions = Table::ALL
            .into_iter()
            .map(|table| (table, watch::channel(0u64).0))
            .collect();
        Self { versions }
    }

    /// Bump a table's version, waking every observer of it.
    pub fn invalidate(&self, table: Table) {
        if let Some(tx) = self.versions.get(&table) {
            tx.send_modify(|version| *version = version.wrapping_add(1));
            trace!(table = table.name(), version = *tx.borrow(), "Table invalidated");
        }
    }

    /// Current version of a table.
    pub fn version(&self, table: Table) -> u64 {
        self.versions.get(&table).map(|tx| *tx.borrow()).unwrap_or(0)
    }

    /// Receive a table's version changes.
    pub fn subscribe(&self, table: Table) -> watch::Receiver<u64> {
        match self.versions.get(&table) {
            Some(tx) => tx.subscribe(),
            None => watch::channel(0u64).1,
        }
    }

    /// Run `query` now and again after every invalidation of `table`.
    ///
    /// Invalidations that arrive while a query is running collapse into a
    /// single re-run. A failed query is emitted as an `Err` item and the
    /// stream keeps observing.
    pub fn observe<T, F, Fut>(&self, table: Table, query: F) -> QueryObservable<T>
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let rx = self.subscribe(table);
        futures::stream::unfold((rx, query, true), |(mut rx, query, first)| async move {
            if !first && rx.changed().await.is_err() {
                return None;
            }
            rx.mark_unchanged();
            let result = query().await;
            Some((result, (rx, query, false)))
        })
        .boxed()
    }
}

impl Default for InvalidationTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn test_invalidate_bumps_only_that_table() {
        let tracker = InvalidationTracker::new();
        tracker.invalidate(Table::BackupFiles);
        tracker.invalidate(Table::BackupFiles);
        assert_eq!(tracker.version(Table::BackupFiles), 2);
        assert_eq!(tracker.version(Table::BackupErrors), 0);
    }

    #[tokio::test]
    async fn test_observe_reruns_after_invalidation() {
        let tracker = InvalidationTracker::new();
        let runs = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&runs);
        let mut stream = tracker.observe(Table::BackupErrors, move || {
            let counter = Arc::clone(&counter);
            async move { Ok(counter.fetch_add(1, Ordering::SeqCst) + 1) }
        });

        assert_eq!(stream.next().await.unwrap().unwrap(), 1);
        tracker.invalidate(Table::BackupFolders);
        tracker.invalidate(Table::BackupErrors);
        assert_eq!(stream.next().await.unwrap().unwrap(), 2);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}
