//! Long-lived managers holding backup run state and platform signals.

pub mod backup;
pub mod signal;

pub use backup::{BackupManager, BackupRunState};
pub use signal::{BackupConnectivityManager, BackupPermissionsManager, SignalManager};
