//! Backup folder bindings and destination folders.

pub mod model;

pub use model::{BackupFolder, DriveFolder};
