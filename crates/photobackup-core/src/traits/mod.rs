//! Collaborator traits defined in `photobackup-core` and implemented by
//! other crates or by the host platform.

pub mod scheduler;
pub mod source;

pub use scheduler::BackupWorkScheduler;
pub use source::{ConnectivitySource, PermissionSource};
