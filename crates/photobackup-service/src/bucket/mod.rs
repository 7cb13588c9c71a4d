//! Device media buckets eligible for backup.

pub mod service;

pub use service::GetAllBuckets;
