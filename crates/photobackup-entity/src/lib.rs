//! # photobackup-entity
//!
//! Domain entity models for PhotoBackup. Every struct in this crate is
//! either a database row (deriving `sqlx::FromRow`) or a derived value
//! object such as [`state::BackupState`]. The [`repository`] module holds
//! the persistence contracts the service layer is written against.

pub mod bucket;
pub mod configuration;
pub mod error;
pub mod file;
pub mod folder;
pub mod job;
pub mod repository;
pub mod state;

pub use bucket::BucketEntry;
pub use configuration::{BackupConfiguration, BackupNetworkType};
pub use error::BackupError;
pub use file::{BackupFile, BackupFileState};
pub use folder::{BackupFolder, DriveFolder};
pub use state::{BackupFileCounts, BackupState, BackupStatus};
