//! Shared value types used across crates.

pub mod error_type;
pub mod failure;
pub mod id;
pub mod signal;

pub use error_type::BackupErrorType;
pub use failure::{ApiFailure, IoFailureKind, NetworkFailure, UploadFailure};
pub use id::{FolderId, JobId};
pub use signal::{BackupConnectivity, BackupPermissions};
