//! Handle to a running backup state computation.

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use photobackup_core::observe::{self, Observable};
use photobackup_entity::state::BackupState;

/// Observes the state computed for one folder.
///
/// Holds `None` until every input has reported. Dropping the handle stops
/// the computation.
#[derive(Debug)]
pub struct BackupStateWatch {
    rx: watch::Receiver<Option<BackupState>>,
    task: JoinHandle<()>,
}

impl BackupStateWatch {
    pub(crate) fn new(rx: watch::Receiver<Option<BackupState>>, task: JoinHandle<()>) -> Self {
        Self { rx, task }
    }

    /// The last published state, if any.
    pub fn current(&self) -> Option<BackupState> {
        self.rx.borrow().clone()
    }

    /// Wait for the first state.
    pub async fn first(&self) -> Option<BackupState> {
        self.wait_for(|_| true).await
    }

    /// Wait until the published state satisfies `predicate`.
    ///
    /// Returns `None` if the computation ended first.
    pub async fn wait_for<F>(&self, mut predicate: F) -> Option<BackupState>
    where
        F: FnMut(&BackupState) -> bool,
    {
        let mut rx = self.rx.clone();
        let state = rx
            .wait_for(|state| state.as_ref().is_some_and(&mut predicate))
            .await
            .ok()?;
        state.clone()
    }

    /// [`Self::wait_for`] bounded by `timeout`.
    pub async fn wait_for_timeout<F>(&self, timeout: Duration, predicate: F) -> Option<BackupState>
    where
        F: FnMut(&BackupState) -> bool,
    {
        tokio::time::timeout(timeout, self.wait_for(predicate))
            .await
            .ok()
            .flatten()
    }

    /// Every published state, starting with the current one if present.
    pub fn changes(&self) -> Observable<BackupState> {
        observe::from_watch(self.rx.clone())
            .filter_map(futures::future::ready)
            .boxed()
    }
}

impl Drop for BackupStateWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}
