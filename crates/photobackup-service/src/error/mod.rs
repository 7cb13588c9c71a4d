//! Backup error history and the errors shown to the user.

pub mod service;

pub use service::GetErrors;
