//! Fixed configuration for delivery and reconnection.
//!
//! The values are deliberately not user-configurable in this core; the
//! structs exist so the transport implementation and the dispatcher consume
//! them explicitly (and so tests can shrink the ack timeout).

use std::time::Duration;

/// Maximum number of retries before a delivery failure is surfaced.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Per-send acknowledgement timeout.
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_millis(5000);

/// Initial delay between automatic reconnection attempts.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(1000);

/// Ceiling for the transport's reconnection backoff.
pub const DEFAULT_RECONNECT_DELAY_MAX: Duration = Duration::from_millis(10_000);

/// Timeout for a single connection attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Reconnection policy handed to the transport implementation at
/// construction.
///
/// The exact backoff curve between `reconnect_delay` and
/// `reconnect_delay_max` is left to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectConfig {
    /// Reconnect automatically after an unexpected disconnect.
    pub reconnection: bool,
    /// Maximum number of reconnection attempts. `None` means unbounded.
    pub reconnection_attempts: Option<u32>,
    /// Initial delay between reconnection attempts.
    pub reconnect_delay: Duration,
    /// Maximum delay between reconnection attempts.
    pub reconnect_delay_max: Duration,
    /// Timeout for a single connection attempt.
    pub connect_timeout: Duration,
    /// Connect as soon as the transport is created.
    pub auto_connect: bool,
    /// Force a fresh connection even when one already exists.
    pub force_new: bool,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            reconnection: true,
            reconnection_attempts: None,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            reconnect_delay_max: DEFAULT_RECONNECT_DELAY_MAX,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            auto_connect: true,
            force_new: false,
        }
    }
}

/// Retry policy for the reliable dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Retries allowed per event before the failure is surfaced.
    pub max_retries: u32,
    /// Acknowledgement timeout per send attempt.
    pub ack_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { max_retries: DEFAULT_MAX_RETRIES, ack_timeout: DEFAULT_ACK_TIMEOUT }
    }
}
