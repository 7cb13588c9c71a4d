//! Observable platform signals with an attach/detach lifecycle.
//!
//! The host owns the real permission and connectivity callbacks. At start-up
//! it attaches a stream of readings to the matching manager; the manager
//! keeps the latest reading and republishes it to every observer. Detaching
//! stops forwarding but keeps the last known value.

use std::fmt;
use std::sync::{Arc, Mutex};

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use photobackup_core::observe::{self, Observable};
use photobackup_core::traits::{ConnectivitySource, PermissionSource};
use photobackup_core::types::signal::{BackupConnectivity, BackupPermissions};

/// Holds the latest value of one platform signal.
pub struct SignalManager<T> {
    name: &'static str,
    state: Arc<watch::Sender<T>>,
    attachment: Mutex<Option<JoinHandle<()>>>,
}

/// Media access permission state.
pub type BackupPermissionsManager = SignalManager<BackupPermissions>;

/// Network connectivity state.
pub type BackupConnectivityManager = SignalManager<BackupConnectivity>;

impl<T> SignalManager<T>
where
    T: Clone + PartialEq + fmt::Display + Send + Sync + 'static,
{
    /// Create a detached manager holding `initial`.
    pub fn new(name: &'static str, initial: T) -> Self {
        Self {
            name,
            state: Arc::new(watch::channel(initial).0),
            attachment: Mutex::new(None),
        }
    }

    /// Record a reading. Observers are woken only if the value changed.
    pub fn set(&self, value: T) {
        publish(&self.state, self.name, value);
    }

    /// Forward every reading of `source` into this manager.
    ///
    /// Replaces any previous attachment. Must be called inside a Tokio
    /// runtime.
    pub fn attach(&self, mut source: Observable<T>) {
        let state = Arc::clone(&self.state);
        let name = self.name;
        let handle = tokio::spawn(async move {
            while let Some(value) = source.next().await {
                publish(&state, name, value);
            }
            debug!(signal = name, "Signal source ended");
        });

        let previous = self
            .attachment
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
        info!(signal = self.name, "Signal source attached");
    }

    /// Stop forwarding readings. The last value is kept.
    pub fn detach(&self) {
        let previous = self
            .attachment
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = previous {
            handle.abort();
            info!(signal = self.name, "Signal source detached");
        }
    }

    /// Whether a source is currently attached.
    pub fn is_attached(&self) -> bool {
        self.attachment
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn value(&self) -> T {
        self.state.borrow().clone()
    }

    fn stream(&self) -> Observable<T> {
        observe::from_watch(self.state.subscribe())
    }
}

fn publish<T>(state: &watch::Sender<T>, name: &'static str, value: T)
where
    T: PartialEq + fmt::Display,
{
    state.send_if_modified(|current| {
        if *current == value {
            return false;
        }
        debug!(signal = name, from = %current, to = %value, "Signal changed");
        *current = value;
        true
    });
}

impl<T> Drop for SignalManager<T> {
    fn drop(&mut self) {
        if let Ok(mut attachment) = self.attachment.lock() {
            if let Some(handle) = attachment.take() {
                handle.abort();
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SignalManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalManager")
            .field("name", &self.name)
            .field("value", &*self.state.borrow())
            .finish()
    }
}

impl BackupPermissionsManager {
    /// Create a permissions manager that has not asked yet.
    pub fn permissions() -> Self {
        Self::new("permissions", BackupPermissions::default())
    }
}

impl BackupConnectivityManager {
    /// Create a connectivity manager that assumes no connection.
    pub fn connectivity() -> Self {
        Self::new("connectivity", BackupConnectivity::default())
    }
}

impl PermissionSource for BackupPermissionsManager {
    fn current(&self) -> BackupPermissions {
        self.value()
    }

    fn observe(&self) -> Observable<BackupPermissions> {
        self.stream()
    }
}

impl ConnectivitySource for BackupConnectivityManager {
    fn current(&self) -> BackupConnectivity {
        self.value()
    }

    fn observe(&self) -> Observable<BackupConnectivity> {
        self.stream()
    }
}
