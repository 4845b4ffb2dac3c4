//! Transport contract for the underlying socket connection.
//!
//! The core never talks to the network directly; it consumes an
//! implementation of [`Transport`] wrapping one logical connection. The
//! implementation is expected to be built from
//! [`ReconnectConfig`](tether_core::ReconnectConfig) and to run its own
//! reconnection loop — the core does not re-dial on its behalf.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

/// Transport errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection attempt failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Send attempted without an active connection.
    #[error("not connected")]
    NotConnected,

    /// The remote acknowledgement did not arrive in time.
    #[error("acknowledgement timed out after {0:?}")]
    AckTimeout(Duration),

    /// The transport has been shut down.
    #[error("transport closed")]
    Closed,
}

/// Remote acknowledgement for an event sent with [`Transport::send_with_ack`].
///
/// Wire shape: `{"status":"ok"}` or `{"status":"error","error":"…"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AckResponse {
    /// The server received and processed the event.
    Ok,
    /// The server reported an application-level error.
    Error {
        /// Server-side error description.
        error: String,
    },
}

/// Connection lifecycle and inbound traffic reported by the transport.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The socket is connected.
    Connected,
    /// The socket disconnected. The reason is informational only.
    Disconnected {
        /// Transport-provided reason string.
        reason: String,
    },
    /// A connection attempt failed. Does not imply a state change: the
    /// transport's own reconnection loop keeps trying.
    ConnectError {
        /// Description of the failure.
        error: String,
    },
    /// An inbound message payload, not yet validated.
    Message(Value),
}

/// A single logical connection with acknowledged sends.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Subscribe to connection events and inbound messages.
    ///
    /// Dropping the receiver is the unsubscribe.
    fn subscribe(&self) -> broadcast::Receiver<TransportEvent>;

    /// Request a connection. A no-op when already connected or connecting.
    async fn connect(&self) -> Result<(), TransportError>;

    /// Drop the connection.
    async fn disconnect(&self) -> Result<(), TransportError>;

    /// Send an event and await the remote acknowledgement.
    ///
    /// The implementation must resolve within `timeout`, returning
    /// [`TransportError::AckTimeout`] when the acknowledgement does not
    /// arrive in time.
    async fn send_with_ack(
        &self,
        event: &str,
        payload: Value,
        timeout: Duration,
    ) -> Result<AckResponse, TransportError>;
}
