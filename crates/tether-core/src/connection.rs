//! Connection and application lifecycle state.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────────┐  active (connect requested)  ┌────────────┐
//! │ Disconnected │─────────────────────────────>│ Connecting │
//! └──────────────┘                              └────────────┘
//!        ↑                                            │
//!        │ transport disconnect    transport connect  │
//!        │                                            ↓
//!        │                                      ┌───────────┐
//!        └──────────────────────────────────────│ Connected │
//!                                               └───────────┘
//! ```
//!
//! The connection manager is the sole writer of [`ConnectionState`]; it
//! derives the state from transport connect/disconnect callbacks plus its
//! own connect requests. Everyone else only reads it.

/// Connection state of the single logical transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No active socket.
    #[default]
    Disconnected,
    /// Connect requested, waiting for the transport to report success.
    Connecting,
    /// Transport reported an active connection.
    Connected,
}

impl ConnectionState {
    /// True when the transport has an active connection.
    pub fn is_connected(self) -> bool {
        self == ConnectionState::Connected
    }
}

/// Application foreground/background phase reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// App is in the foreground and interactive.
    Active,
    /// App moved to the background; the session drops its socket.
    Background,
    /// Transitional phase (e.g. interrupted by a system dialog). Ignored.
    Inactive,
}
