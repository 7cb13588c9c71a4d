//! Background job entities for the backup worker.

pub mod model;
pub mod status;

pub use model::{BackupJob, BackupJobKind};
pub use status::JobStatus;
