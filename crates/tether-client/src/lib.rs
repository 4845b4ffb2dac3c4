//! Reliable-delivery chat client core.
//!
//! Client-side layer atop a persistent bidirectional socket connection:
//! queues outgoing events while disconnected, retries unacknowledged sends
//! with bounded attempts, and reconciles the connection lifecycle with
//! application foreground/background transitions.
//!
//! # Components
//!
//! - [`Transport`]: contract for the underlying socket implementation
//!   (connect/disconnect, event subscription, acknowledged send).
//! - [`LifecycleMonitor`]: contract for the OS foreground/background
//!   notifier.
//! - [`ConnectionManager`]: owns the transport for the session lifetime,
//!   tracks [`ConnectionState`], bridges lifecycle phases to
//!   connect/disconnect calls, and fans inbound messages out to subscribers.
//! - [`ReliableDispatcher`]: single entry point for sending an event with
//!   delivery confidence; hides disconnection and transient failure behind
//!   automatic queueing and bounded retry, draining the queue on reconnect.
//! - [`Session`]: facade that wires the pieces together and exposes the
//!   state the view layer renders.
//!
//! # Data flow
//!
//! ```text
//! view ──> Session::dispatch ──> ReliableDispatcher ──> Transport ──> network
//! network ──> Transport events ──> ConnectionManager ──> message log + subscribers
//! ```
//!
//! Everything runs as cooperating tokio tasks; a current-thread runtime is
//! sufficient. No state is persisted across process restarts.

#![forbid(unsafe_code)]

mod dispatcher;
mod lifecycle;
mod manager;
mod session;
mod transport;

pub use dispatcher::ReliableDispatcher;
pub use lifecycle::LifecycleMonitor;
pub use manager::ConnectionManager;
pub use session::{Session, SessionConfig};
pub use tether_core::{
    ConnectionState, DeliveryError, DispatchConfig, InboundMessage, LifecyclePhase,
    MalformedMessage, QueuedEvent, ReconnectConfig,
};
pub use transport::{AckResponse, Transport, TransportError, TransportEvent};
