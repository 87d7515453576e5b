//! Outbound application events.
//!
//! The [`AgentService`](super::service::AgentService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log to serial, record in a test,
//! drive a display, etc.

use crate::app::ports::LinkError;
use crate::link::manager::LinkState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The agent service has started.
    Started,

    /// The connectivity state machine moved.
    LinkChanged { from: LinkState, to: LinkState },

    /// A debounced press was confirmed (monotonic ms since start).
    PressDetected { at_ms: u64 },

    /// The press payload reached the broker.
    PressPublished { at_ms: u64 },

    /// The press payload was dropped after a transport failure.
    PublishFailed { at_ms: u64, error: LinkError },
}
