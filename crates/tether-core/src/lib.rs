//! Domain core for the tether reliable-delivery chat client.
//!
//! Pure state and types with no I/O and no runtime dependency: connection
//! state, the append-only inbound message log, the pending event queue, the
//! fixed delivery/reconnection configuration, and the error taxonomy.
//!
//! The async orchestration layer lives in `tether-client`; everything here is
//! directly testable without a runtime.

#![forbid(unsafe_code)]

mod config;
mod connection;
mod error;
mod message;
mod queue;

pub use config::{
    DispatchConfig, ReconnectConfig, DEFAULT_ACK_TIMEOUT, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_MAX_RETRIES, DEFAULT_RECONNECT_DELAY, DEFAULT_RECONNECT_DELAY_MAX,
};
pub use connection::{ConnectionState, LifecyclePhase};
pub use error::{DeliveryError, MalformedMessage};
pub use message::{InboundMessage, MessageLog};
pub use queue::{PendingQueue, QueuedEvent};
