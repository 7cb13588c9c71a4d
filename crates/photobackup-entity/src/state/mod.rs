//! Derived backup state value objects.

pub mod counts;
pub mod model;

pub use counts::BackupFileCounts;
pub use model::{BackupState, BackupStatus};
