//! Pending event queue for deferred delivery.
//!
//! Events land here when a dispatch attempt cannot complete: either the
//! connection was down, or a send failed with retries remaining. The drain
//! routine snapshots and clears the whole queue in one step
//! (`take_all`), then re-dispatches every entry; entries that fail again
//! re-enter through the normal enqueue path with an incremented attempt.

use serde_json::Value;

/// An outgoing event waiting for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedEvent {
    /// Event name understood by the server.
    pub event: String,
    /// Arbitrary structured payload.
    pub payload: Value,
    /// Delivery attempts already consumed.
    pub attempt: u32,
}

impl QueuedEvent {
    /// A fresh event that has not been attempted yet.
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self { event: event.into(), payload, attempt: 0 }
    }

    /// The same event with one more consumed attempt.
    pub fn next_attempt(self) -> Self {
        Self { attempt: self.attempt + 1, ..self }
    }
}

/// FIFO queue of events awaiting delivery.
#[derive(Debug, Default)]
pub struct PendingQueue {
    items: Vec<QueuedEvent>,
}

impl PendingQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event at the back.
    pub fn push(&mut self, event: QueuedEvent) {
        self.items.push(event);
    }

    /// Snapshot the queue in order and leave it empty.
    pub fn take_all(&mut self) -> Vec<QueuedEvent> {
        std::mem::take(&mut self.items)
    }

    /// Queued events in order, without consuming them.
    pub fn snapshot(&self) -> Vec<QueuedEvent> {
        self.items.clone()
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
