//! Error taxonomy for the delivery core.
//!
//! Transient failures (ack errors, timeouts, disconnects mid-send) are not
//! errors at this level: the dispatcher absorbs them into the pending queue.
//! Only exhausted retries and malformed inbound payloads have named types.

use thiserror::Error;

/// Delivery failed permanently: the event exhausted its retry budget.
///
/// This is the only failure mode surfaced to the caller of `dispatch`; the
/// view layer is expected to present it to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("event {event} failed after {retries} retries")]
pub struct DeliveryError {
    /// Name of the event that could not be delivered.
    pub event: String,
    /// Number of retries that were attempted.
    pub retries: u32,
}

/// An inbound payload that does not satisfy the message shape.
///
/// Malformed payloads are dropped and logged, never surfaced or retried.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MalformedMessage {
    /// Payload is not a JSON object.
    #[error("inbound payload is not an object")]
    NotObject,
    /// Payload lacks a string `id` field.
    #[error("inbound payload is missing an id")]
    MissingId,
    /// Payload lacks a string `text` field.
    #[error("inbound payload is missing a text")]
    MissingText,
}
