//! Enabling and disabling backup for folders.

pub mod service;

pub use service::FolderService;
