//! Reactive backup state of a folder.

pub mod inputs;
pub mod service;
pub mod watch;

pub use service::GetBackupState;
pub use watch::BackupStateWatch;
