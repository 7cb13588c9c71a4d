//! # photobackup-service
//!
//! Backup use cases for PhotoBackup. Services orchestrate repositories, the
//! permission and connectivity managers, and the work scheduler; the
//! [`state::GetBackupState`] fan-in turns all of them into one reactive
//! [`photobackup_entity::state::BackupState`] per folder, and the
//! [`handler::UploadErrorHandler`] applies the recovery policy for failed
//! uploads.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references. [`context::BackupServices`]
//! wires the full graph.

pub mod bucket;
pub mod configuration;
pub mod context;
pub mod error;
pub mod file;
pub mod folder;
pub mod handler;
pub mod manager;
pub mod state;

pub use bucket::GetAllBuckets;
pub use configuration::ConfigurationService;
pub use context::{BackupRepositories, BackupServices};
pub use error::GetErrors;
pub use file::{FileService, GetBackupStatus};
pub use folder::FolderService;
pub use handler::{StopBackup, UploadErrorHandler};
pub use manager::{BackupConnectivityManager, BackupManager, BackupPermissionsManager};
pub use state::{BackupStateWatch, GetBackupState};
