//! Connection manager.
//!
//! Owns one transport handle for the lifetime of the chat session, tracks
//! [`ConnectionState`], appends validated inbound messages to the session
//! log, and bridges OS lifecycle transitions to connect/disconnect calls.
//!
//! The manager is the sole writer of the connection state; it publishes the
//! state through a watch channel that the dispatcher and the view layer
//! read.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, watch};

use tether_core::{ConnectionState, InboundMessage, LifecyclePhase, MessageLog};

use crate::{
    lifecycle::LifecycleMonitor,
    transport::{Transport, TransportEvent},
};

/// Capacity of the inbound message fan-out channel.
const INBOUND_FANOUT_CAPACITY: usize = 64;

/// Bridges transport and lifecycle events into connection state and the
/// inbound message log.
pub struct ConnectionManager<T> {
    transport: Arc<T>,
    transport_rx: broadcast::Receiver<TransportEvent>,
    lifecycle_rx: broadcast::Receiver<LifecyclePhase>,
    state_tx: watch::Sender<ConnectionState>,
    log: Arc<Mutex<MessageLog>>,
    inbound_tx: broadcast::Sender<InboundMessage>,
}

impl<T: Transport> ConnectionManager<T> {
    /// Create a manager owning `transport`, subscribed to `lifecycle`.
    ///
    /// Subscriptions are taken here, before the task runs, so no event
    /// published after construction is missed.
    pub fn new(transport: Arc<T>, lifecycle: &dyn LifecycleMonitor) -> Self {
        let transport_rx = transport.subscribe();
        let lifecycle_rx = lifecycle.subscribe();
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let (inbound_tx, _) = broadcast::channel(INBOUND_FANOUT_CAPACITY);
        Self {
            transport,
            transport_rx,
            lifecycle_rx,
            state_tx,
            log: Arc::new(Mutex::new(MessageLog::new())),
            inbound_tx,
        }
    }

    /// Watch receiver for the connection state.
    pub fn state_watch(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Subscribe to validated inbound messages.
    pub fn subscribe_messages(&self) -> broadcast::Receiver<InboundMessage> {
        self.inbound_tx.subscribe()
    }

    /// Shared handle to the session message log.
    pub(crate) fn log_handle(&self) -> Arc<Mutex<MessageLog>> {
        Arc::clone(&self.log)
    }

    /// Run the manager loop until both event sources are gone.
    ///
    /// On exit the transport is disconnected and the state is flipped to
    /// [`ConnectionState::Disconnected`].
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                event = self.transport_rx.recv() => match event {
                    Ok(event) => self.handle_transport_event(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "lagged behind transport events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                phase = self.lifecycle_rx.recv() => match phase {
                    Ok(phase) => self.handle_lifecycle(phase).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "lagged behind lifecycle events");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }

        if let Err(err) = self.transport.disconnect().await {
            tracing::debug!(%err, "disconnect on teardown failed");
        }
        self.state_tx.send_replace(ConnectionState::Disconnected);
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => {
                tracing::info!("connected to server");
                self.state_tx.send_replace(ConnectionState::Connected);
            }
            TransportEvent::Disconnected { reason } => {
                // Reason is informational; the transport's own reconnection
                // loop governs recovery.
                tracing::warn!(%reason, "disconnected");
                self.state_tx.send_replace(ConnectionState::Disconnected);
            }
            TransportEvent::ConnectError { error } => {
                // No state change: a failed attempt does not tell us whether
                // we were Disconnected or Connecting.
                tracing::error!(%error, "connection error");
            }
            TransportEvent::Message(payload) => match InboundMessage::from_payload(&payload) {
                Ok(message) => {
                    self.log
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(message.clone());
                    // Send only fails when nobody subscribes, which is fine.
                    let _ = self.inbound_tx.send(message);
                }
                Err(err) => {
                    tracing::warn!(%err, %payload, "dropping malformed inbound message");
                }
            },
        }
    }

    async fn handle_lifecycle(&mut self, phase: LifecyclePhase) {
        match phase {
            LifecyclePhase::Active => {
                if self.state_tx.borrow().is_connected() {
                    return;
                }
                self.state_tx.send_replace(ConnectionState::Connecting);
                if let Err(err) = self.transport.connect().await {
                    tracing::warn!(%err, "connect request failed");
                    self.state_tx.send_replace(ConnectionState::Disconnected);
                }
            }
            LifecyclePhase::Background => {
                // Power-saving policy: background sessions drop the socket
                // rather than holding it open.
                if let Err(err) = self.transport.disconnect().await {
                    tracing::debug!(%err, "disconnect request failed");
                }
            }
            LifecyclePhase::Inactive => {}
        }
    }
}
