//! Recorded backup errors.

pub mod model;

pub use model::BackupError;
