//! Device media buckets.

use serde::{Deserialize, Serialize};

/// An OS-level grouping of media items (for example "Camera").
///
/// Buckets are enumerated from the device on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketEntry {
    /// Platform bucket identifier.
    pub bucket_id: i32,
    /// Display name, when the platform provides one.
    pub bucket_name: Option<String>,
}

impl BucketEntry {
    /// Create a bucket entry.
    pub fn new(bucket_id: i32, bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_id,
            bucket_name: Some(bucket_name.into()),
        }
    }

    /// Whether the bucket's display name equals `name`.
    pub fn is_named(&self, name: &str) -> bool {
        self.bucket_name.as_deref() == Some(name)
    }
}
