//! Lifecycle monitor contract.
//!
//! The OS notifies the app of foreground/background transitions; the core
//! only subscribes. On `Active` the session reconnects, on `Background` it
//! drops the socket rather than holding it open.

use tokio::sync::broadcast;

use tether_core::LifecyclePhase;

/// Source of application foreground/background transitions.
pub trait LifecycleMonitor: Send + Sync {
    /// Subscribe to phase changes.
    ///
    /// Dropping the receiver is the unsubscribe; the connection manager
    /// holds its receiver for exactly as long as its task runs.
    fn subscribe(&self) -> broadcast::Receiver<LifecyclePhase>;
}
