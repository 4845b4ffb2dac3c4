//! Chat session facade.
//!
//! Wires the connection manager and the reliable dispatcher together,
//! spawns their tasks, and exposes the state the view layer renders:
//! connection status, the message history, and `dispatch`.
//!
//! Teardown is guaranteed on every exit path: [`Session::close`] disconnects
//! the transport gracefully, and dropping the session without closing it
//! aborts the background tasks (releasing every event subscription) and
//! issues a best-effort disconnect so no socket is left open.

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};

use tether_core::{
    ConnectionState, DeliveryError, DispatchConfig, InboundMessage, MessageLog, QueuedEvent,
};

use crate::{
    dispatcher::ReliableDispatcher, lifecycle::LifecycleMonitor, manager::ConnectionManager,
    transport::Transport,
};

/// Session-level configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfig {
    /// Retry policy for outgoing events.
    pub dispatch: DispatchConfig,
}

/// A running chat session over one transport.
pub struct Session<T: Transport> {
    transport: Arc<T>,
    state_rx: watch::Receiver<ConnectionState>,
    log: Arc<Mutex<MessageLog>>,
    inbound_rx: broadcast::Receiver<InboundMessage>,
    dispatcher: ReliableDispatcher<T>,
    manager_task: JoinHandle<()>,
    drain_task: JoinHandle<()>,
    closed: bool,
}

impl<T: Transport> Session<T> {
    /// Start a session over `transport`, following `lifecycle` transitions.
    ///
    /// The transport is expected to have been built from
    /// [`ReconnectConfig`](tether_core::ReconnectConfig): it reconnects on
    /// its own and connects eagerly when `auto_connect` is set, so the
    /// session starts in [`ConnectionState::Disconnected`] and waits for the
    /// transport's connect event.
    pub fn start(transport: T, lifecycle: &dyn LifecycleMonitor, config: SessionConfig) -> Self {
        let transport = Arc::new(transport);
        let manager = ConnectionManager::new(Arc::clone(&transport), lifecycle);
        let state_rx = manager.state_watch();
        let inbound_rx = manager.subscribe_messages();
        let log = manager.log_handle();
        let dispatcher =
            ReliableDispatcher::new(Arc::clone(&transport), state_rx.clone(), config.dispatch);

        let manager_task = tokio::spawn(manager.run());
        let drain_task = tokio::spawn(dispatcher.clone().run_drain());

        Self {
            transport,
            state_rx,
            log,
            inbound_rx,
            dispatcher,
            manager_task,
            drain_task,
            closed: false,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// True when the transport has an active connection.
    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Watch receiver for connection state changes.
    pub fn state_watch(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Snapshot of the message history, in arrival order.
    pub fn messages(&self) -> Vec<InboundMessage> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).entries().to_vec()
    }

    /// Subscribe to inbound messages as they are accepted.
    pub fn subscribe_messages(&self) -> broadcast::Receiver<InboundMessage> {
        self.inbound_rx.resubscribe()
    }

    /// Send an event with delivery confidence.
    ///
    /// # Errors
    ///
    /// [`DeliveryError`] once the event has exhausted its retry budget.
    pub async fn dispatch(
        &self,
        event: impl Into<String>,
        payload: Value,
    ) -> Result<(), DeliveryError> {
        self.dispatcher.dispatch(event, payload).await
    }

    /// The dispatcher backing this session.
    pub fn dispatcher(&self) -> &ReliableDispatcher<T> {
        &self.dispatcher
    }

    /// Snapshot of events awaiting delivery.
    pub fn pending(&self) -> Vec<QueuedEvent> {
        self.dispatcher.pending()
    }

    /// End the session: stop the background tasks and disconnect.
    pub async fn close(mut self) {
        self.closed = true;
        self.manager_task.abort();
        self.drain_task.abort();
        if let Err(err) = self.transport.disconnect().await {
            tracing::debug!(%err, "disconnect on close failed");
        }
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        self.manager_task.abort();
        self.drain_task.abort();
        if self.closed {
            return;
        }
        // Abort cancels the manager before its own teardown runs, so a
        // session dropped without close() still has a socket to release.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let transport = Arc::clone(&self.transport);
            handle.spawn(async move {
                if let Err(err) = transport.disconnect().await {
                    tracing::debug!(%err, "disconnect on drop failed");
                }
            });
        }
    }
}
