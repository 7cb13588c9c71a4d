//! Per-file backup queue entities.

pub mod model;
pub mod state;

pub use model::BackupFile;
pub use state::BackupFileState;
