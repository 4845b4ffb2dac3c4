//! In-process doubles for the transport and lifecycle contracts.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use tether_client::{
    AckResponse, LifecycleMonitor, LifecyclePhase, Transport, TransportError, TransportEvent,
};

/// Scriptable transport double.
///
/// Tests fire connection events and inbound messages explicitly and script
/// acknowledgement outcomes per send; unscripted sends ack with `Ok`.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Inner>,
}

struct Inner {
    events: broadcast::Sender<TransportEvent>,
    acks: Mutex<VecDeque<Result<AckResponse, TransportError>>>,
    sent: Mutex<Vec<(String, Value)>>,
    connects: AtomicUsize,
    disconnects: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Inner {
                events,
                acks: Mutex::new(VecDeque::new()),
                sent: Mutex::new(Vec::new()),
                connects: AtomicUsize::new(0),
                disconnects: AtomicUsize::new(0),
            }),
        }
    }

    /// Emit a transport event to all subscribers.
    pub fn fire(&self, event: TransportEvent) {
        let _ = self.inner.events.send(event);
    }

    /// Script the outcome of the next unscripted send.
    pub fn push_ack(&self, outcome: Result<AckResponse, TransportError>) {
        self.inner.acks.lock().unwrap_or_else(PoisonError::into_inner).push_back(outcome);
    }

    /// Everything sent through the transport, in order.
    pub fn sent(&self) -> Vec<(String, Value)> {
        self.inner.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn connect_calls(&self) -> usize {
        self.inner.connects.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.inner.disconnects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn subscribe(&self) -> broadcast::Receiver<TransportEvent> {
        self.inner.events.subscribe()
    }

    async fn connect(&self) -> Result<(), TransportError> {
        self.inner.connects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        self.inner.disconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send_with_ack(
        &self,
        event: &str,
        payload: Value,
        _timeout: Duration,
    ) -> Result<AckResponse, TransportError> {
        self.inner
            .sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((event.to_owned(), payload));
        self.inner
            .acks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Ok(AckResponse::Ok))
    }
}

/// Lifecycle monitor double driven by the test.
pub struct MockLifecycle {
    tx: broadcast::Sender<LifecyclePhase>,
}

impl MockLifecycle {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Report a phase transition.
    pub fn set(&self, phase: LifecyclePhase) {
        let _ = self.tx.send(phase);
    }
}

impl LifecycleMonitor for MockLifecycle {
    fn subscribe(&self) -> broadcast::Receiver<LifecyclePhase> {
        self.tx.subscribe()
    }
}

/// Poll `cond` until it holds, panicking after two seconds.
pub async fn wait_for<F: Fn() -> bool>(cond: F) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not met within 2s");
}

/// Give spawned tasks a moment to observe an event that should be a no-op.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
