//! Observable platform signal sources.

use crate::observe::Observable;
use crate::types::signal::{BackupConnectivity, BackupPermissions};

/// Source of the media access permission state.
pub trait PermissionSource: Send + Sync + 'static {
    /// The permission state right now.
    fn current(&self) -> BackupPermissions;

    /// The permission state now and after every change.
    fn observe(&self) -> Observable<BackupPermissions>;
}

/// Source of the network connectivity classification.
pub trait ConnectivitySource: Send + Sync + 'static {
    /// The connectivity right now.
    fn current(&self) -> BackupConnectivity;

    /// The connectivity now and after every change.
    fn observe(&self) -> Observable<BackupConnectivity>;
}
