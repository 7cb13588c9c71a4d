//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of concurrent job processing tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interval in milliseconds between job queue polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_milliseconds: u64,
    /// Delay before a scheduled backup notification becomes runnable.
    #[serde(default = "default_notification_delay")]
    pub notification_delay_seconds: u64,
    /// Window in which repeated notification requests for a folder collapse
    /// into one job.
    #[serde(default = "default_coalesce_window")]
    pub coalesce_window_seconds: u64,
    /// Maximum attempts for a job failing transiently.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            concurrency: default_concurrency(),
            poll_interval_milliseconds: default_poll_interval(),
            notification_delay_seconds: default_notification_delay(),
            coalesce_window_seconds: default_coalesce_window(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    2
}

fn default_poll_interval() -> u64 {
    500
}

fn default_notification_delay() -> u64 {
    30
}

fn default_coalesce_window() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    3
}
