//! Inbound messages and the session message log.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MalformedMessage;

/// A chat message received from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Server-assigned message ID.
    pub id: String,
    /// Message text.
    pub text: String,
}

impl InboundMessage {
    /// Validate an arbitrary inbound payload into a message.
    ///
    /// The payload must be an object with string `id` and `text` fields;
    /// extra fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedMessage`] describing the first missing piece.
    pub fn from_payload(payload: &Value) -> Result<Self, MalformedMessage> {
        let obj = payload.as_object().ok_or(MalformedMessage::NotObject)?;
        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .ok_or(MalformedMessage::MissingId)?;
        let text = obj
            .get("text")
            .and_then(Value::as_str)
            .ok_or(MalformedMessage::MissingText)?;
        Ok(Self { id: id.to_owned(), text: text.to_owned() })
    }
}

/// Append-only, arrival-ordered log of accepted inbound messages.
///
/// Grows for the lifetime of the session. Duplicate IDs are not filtered:
/// redelivered messages stay visible to consumers.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Vec<InboundMessage>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, preserving arrival order.
    pub fn push(&mut self, message: InboundMessage) {
        self.entries.push(message);
    }

    /// Messages in arrival order.
    pub fn entries(&self) -> &[InboundMessage] {
        &self.entries
    }

    /// Number of accepted messages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no message has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
