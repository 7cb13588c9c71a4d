//! Reactions to upload failures.

pub mod classify;
pub mod stop;
pub mod upload_error;

pub use classify::{FailureClass, classify, has_effect_on_backup};
pub use stop::StopBackup;
pub use upload_error::UploadErrorHandler;
