//! Per-folder backup settings.

pub mod service;

pub use service::ConfigurationService;
