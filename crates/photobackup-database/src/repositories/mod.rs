//! SQLite implementations of the repository contracts.

pub mod configuration;
pub mod drive_folder;
pub mod error;
pub mod file;
pub mod folder;

pub use configuration::SqliteBackupConfigurationRepository;
pub use drive_folder::SqliteDriveFolderRepository;
pub use error::SqliteBackupErrorRepository;
pub use file::SqliteBackupFileRepository;
pub use folder::SqliteBackupFolderRepository;
