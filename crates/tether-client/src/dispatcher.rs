//! Reliable dispatcher.
//!
//! Single entry point for sending an event with delivery confidence.
//! Disconnection and transient send failures are hidden behind automatic
//! queueing: the caller only sees an error once an event has exhausted its
//! retry budget.
//!
//! # Dispatch attempt
//!
//! ```text
//! Attempting ──> Acknowledged          resolve Ok
//!            ──> AckFailed / TimedOut  re-enqueue (attempt + 1) or reject
//!            ──> Disconnected          enqueue as-is, resolve Ok
//! ```
//!
//! The queue is drained once per transition into Connected: the drain takes
//! a snapshot, clears the queue, and re-dispatches every entry
//! fire-and-forget. Entries failing again re-enter through the normal
//! enqueue path, so a drain may immediately repopulate the queue — rapid
//! reconnects retry without a separate scheduler.

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tokio::sync::watch;

use tether_core::{ConnectionState, DeliveryError, DispatchConfig, PendingQueue, QueuedEvent};

use crate::transport::{AckResponse, Transport};

/// Queues, sends, and retries outgoing events.
///
/// Cheaply cloneable; clones share the pending queue and the transport.
pub struct ReliableDispatcher<T> {
    transport: Arc<T>,
    state_rx: watch::Receiver<ConnectionState>,
    queue: Arc<Mutex<PendingQueue>>,
    config: DispatchConfig,
}

impl<T> Clone for ReliableDispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            state_rx: self.state_rx.clone(),
            queue: Arc::clone(&self.queue),
            config: self.config,
        }
    }
}

impl<T: Transport> ReliableDispatcher<T> {
    /// Create a dispatcher sending through `transport`, reading the
    /// connection state from `state_rx`.
    pub fn new(
        transport: Arc<T>,
        state_rx: watch::Receiver<ConnectionState>,
        config: DispatchConfig,
    ) -> Self {
        Self { transport, state_rx, queue: Arc::new(Mutex::new(PendingQueue::new())), config }
    }

    /// Send an event with delivery confidence.
    ///
    /// Resolves `Ok` when the event was acknowledged *or* absorbed into the
    /// pending queue (disconnected, or failed with retries remaining).
    ///
    /// # Errors
    ///
    /// [`DeliveryError`] once the event has exhausted its retry budget.
    pub async fn dispatch(
        &self,
        event: impl Into<String>,
        payload: Value,
    ) -> Result<(), DeliveryError> {
        self.dispatch_queued(QueuedEvent::new(event, payload)).await
    }

    /// Dispatch an event carrying its accumulated attempt count.
    ///
    /// This is the path the drain takes, preserving attempts across
    /// reconnects.
    ///
    /// # Errors
    ///
    /// [`DeliveryError`] when `attempt` has already reached the retry limit
    /// and this attempt also fails.
    pub async fn dispatch_queued(&self, entry: QueuedEvent) -> Result<(), DeliveryError> {
        if !self.state_rx.borrow().is_connected() {
            tracing::warn!(event = %entry.event, "disconnected, queueing event");
            self.enqueue(entry);
            return Ok(());
        }

        let timeout = self.config.ack_timeout;
        let send = self.transport.send_with_ack(&entry.event, entry.payload.clone(), timeout);
        // Race the transport against our own timer so a hung implementation
        // cannot outlive the contract.
        let outcome = match tokio::time::timeout(timeout, send).await {
            Ok(Ok(AckResponse::Ok)) => {
                tracing::debug!(event = %entry.event, "event delivered");
                return Ok(());
            }
            Ok(Ok(AckResponse::Error { error })) => error,
            Ok(Err(err)) => err.to_string(),
            Err(_) => format!("acknowledgement timed out after {timeout:?}"),
        };

        tracing::warn!(event = %entry.event, %outcome, "ack failed");
        if entry.attempt < self.config.max_retries {
            let retry = entry.next_attempt();
            tracing::debug!(
                event = %retry.event,
                attempt = retry.attempt,
                max = self.config.max_retries,
                "queueing retry"
            );
            self.enqueue(retry);
            return Ok(());
        }

        let err = DeliveryError { event: entry.event, retries: self.config.max_retries };
        tracing::error!(%err, "delivery failed permanently");
        Err(err)
    }

    /// Snapshot of the pending queue, in delivery order.
    pub fn pending(&self) -> Vec<QueuedEvent> {
        self.lock_queue().snapshot()
    }

    /// Run the drain loop: re-dispatch every queued event once per
    /// transition into Connected.
    ///
    /// Ends when the state channel is closed (session teardown).
    pub(crate) async fn run_drain(mut self) {
        // Read through the receiver's cursor: a Connected published before
        // the first poll must count as a transition, not as the baseline.
        let mut was_connected = self.state_rx.borrow_and_update().is_connected();
        if was_connected {
            self.drain();
        }
        loop {
            if self.state_rx.changed().await.is_err() {
                break;
            }
            let connected = self.state_rx.borrow_and_update().is_connected();
            if connected && !was_connected {
                self.drain();
            }
            was_connected = connected;
        }
    }

    /// Snapshot-and-clear the queue, re-dispatching every entry.
    ///
    /// Each entry is re-dispatched fire-and-forget: drain does not wait for
    /// one acknowledgement before starting the next. Nobody awaits these
    /// results, so exhausted retries here are logged, not surfaced.
    fn drain(&self) {
        let entries = self.lock_queue().take_all();
        if entries.is_empty() {
            return;
        }
        tracing::info!(count = entries.len(), "draining pending events");
        for entry in entries {
            let dispatcher = self.clone();
            tokio::spawn(async move {
                if let Err(err) = dispatcher.dispatch_queued(entry).await {
                    tracing::error!(%err, "dropping event after exhausted retries");
                }
            });
        }
    }

    fn enqueue(&self, entry: QueuedEvent) {
        self.lock_queue().push(entry);
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, PendingQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
