//! Backup behaviour configuration.

use serde::{Deserialize, Serialize};

/// Settings that shape how backup state is derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Name of the device bucket treated as the default backup source.
    #[serde(default = "default_bucket_name")]
    pub default_bucket_name: String,
    /// Whether folders without an explicit configuration may back up over
    /// metered connections.
    #[serde(default)]
    pub allow_mobile_data: bool,
    /// How long recorded backup errors are kept before pruning.
    #[serde(default = "default_error_retention_days")]
    pub error_retention_days: u32,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            default_bucket_name: default_bucket_name(),
            allow_mobile_data: false,
            error_retention_days: default_error_retention_days(),
        }
    }
}

fn default_bucket_name() -> String {
    "Camera".to_string()
}

fn default_error_retention_days() -> u32 {
    30
}
