//! In-process broadcast bus for domain events.

use tokio::sync::broadcast;
use tracing::trace;

use super::DomainEvent;

/// Default number of events buffered per subscriber.
const DEFAULT_CAPACITY: usize = 256;

/// Fan-out channel for [`DomainEvent`]s.
///
/// Publishing never blocks; slow subscribers lose the oldest events.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus with the default per-subscriber buffer.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus with a custom per-subscriber buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event. Returns the number of subscribers that received it.
    pub fn publish(&self, event: impl Into<DomainEvent>) -> usize {
        let event = event.into();
        trace!(event_id = %event.id, "Publishing domain event");
        // No subscribers is not an error.
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
