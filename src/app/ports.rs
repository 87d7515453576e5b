//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AgentService (domain)
//! ```
//!
//! Driven adapters (pin I/O, WiFi, broker session, storage, delay, event
//! sinks) implement these traits. The [`AgentService`](super::service::AgentService)
//! and the [`ConnectivityManager`](crate::link::manager::ConnectivityManager)
//! consume them via generics, so the core never touches hardware directly.
//!
//! All port errors are typed — callers must handle every variant explicitly.

use core::fmt;

use crate::config::AgentConfig;

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain samples the raw button line through this.
pub trait InputPort {
    /// Current electrical level of the input line. `true` = high.
    ///
    /// The line is pulled up and the switch is active-low; polarity mapping
    /// is the debounce detector's job, not the adapter's.
    fn read_raw_level(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: a status output toggled once per successful publish.
pub trait IndicatorPort {
    fn toggle_indicator(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Network port (driven adapter: domain → wireless association)
// ───────────────────────────────────────────────────────────────

/// Network-layer association with the access point.
///
/// Credentials are adapter state, configured once at construction; the
/// domain only asks for the association to exist.
pub trait NetworkPort {
    fn connect(&mut self) -> Result<(), LinkError>;
    fn is_connected(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Session port (driven adapter: domain → broker session)
// ───────────────────────────────────────────────────────────────

/// Broker messaging session, stacked on top of [`NetworkPort`].
pub trait SessionPort {
    /// Establish a fresh session under `client_id`.
    fn connect(&mut self, client_id: &str) -> Result<(), LinkError>;

    /// Deliver one payload to `topic`.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError>;

    /// Service keep-alives and inbound traffic; call every tick.
    fn poll(&mut self) -> Result<(), LinkError>;

    /// Whether the session believes itself established.
    fn is_alive(&self) -> bool;

    /// Tear the session down for a cold restart.
    fn disconnect(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Delay port (driven adapter: domain → scheduler/timer)
// ───────────────────────────────────────────────────────────────

/// Blocking delay, used for reconnect backoff and the tick cadence.
pub trait DelayPort {
    fn delay_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ← persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads the startup configuration.
///
/// Configuration is read once at boot and immutable afterwards; there is
/// no runtime write path in this firmware.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`ConfigError::NotFound`] if nothing was provisioned.
    fn load(&self) -> Result<AgentConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, test
/// recorder, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`NetworkPort`] and [`SessionPort`] operations.
///
/// Everything here is transient from the process's point of view: the
/// connectivity manager recovers by cold-resetting the link. A variant
/// only reaches the agent loop when a publish was already accepted work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// Association with the access point failed.
    NetworkConnectFailed,
    /// The broker refused or dropped the session handshake.
    SessionConnectFailed,
    /// The broker session rejected a publish.
    PublishRejected,
    /// Keep-alive servicing found the session dead.
    SessionLost,
    /// An operation was attempted with no established session.
    NotConnected,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkConnectFailed => write!(f, "network association failed"),
            Self::SessionConnectFailed => write!(f, "broker session connect failed"),
            Self::PublishRejected => write!(f, "publish rejected by transport"),
            Self::SessionLost => write!(f, "broker session lost"),
            Self::NotConnected => write!(f, "no established session"),
        }
    }
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
