//! Domain events emitted by PhotoBackup operations.
//!
//! Events are dispatched through the [`EventBus`] and consumed by the
//! upload-error handler, the notification worker, and any host UI that
//! wants to announce backup lifecycle changes.

pub mod backup;
pub mod bus;
pub mod upload;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use backup::{BackupEvent, BackupStopReason};
pub use bus::EventBus;
pub use upload::{UploadError, UploadFileLink};

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// An upload attempt failed.
    UploadFailed(UploadError),
    /// A backup lifecycle announcement.
    Backup(BackupEvent),
}

impl DomainEvent {
    /// Create a new domain event stamped with the current time.
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            payload,
        }
    }
}

impl From<BackupEvent> for DomainEvent {
    fn from(event: BackupEvent) -> Self {
        Self::new(EventPayload::Backup(event))
    }
}

impl From<UploadError> for DomainEvent {
    fn from(error: UploadError) -> Self {
        Self::new(EventPayload::UploadFailed(error))
    }
}
