//! # photobackup-core
//!
//! Core crate for PhotoBackup. Contains the collaborator traits
//! (permission and connectivity sources, work scheduler),
//! configuration schemas, typed identifiers, the upload-failure taxonomy,
//! domain events, observable-stream helpers, and the unified error system.
//!
//! This crate has **no** internal dependencies on other PhotoBackup crates.

pub mod config;
pub mod error;
pub mod events;
pub mod observe;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
