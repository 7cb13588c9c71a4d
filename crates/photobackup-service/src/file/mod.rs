//! Per-file backup queue operations and progress status.

pub mod service;
pub mod status;

pub use service::FileService;
pub use status::GetBackupStatus;
