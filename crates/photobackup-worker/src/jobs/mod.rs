//! Built-in job handler implementations.

pub mod notification;
pub mod prune;

pub use notification::BackupNotificationJobHandler;
pub use prune::ErrorPruneJobHandler;
