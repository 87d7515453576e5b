//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production). A display or network sink
//! would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | agent loop running");
            }
            AppEvent::LinkChanged { from, to } => {
                info!("LINK  | {:?} -> {:?}", from, to);
            }
            AppEvent::PressDetected { at_ms } => {
                info!("PRESS | confirmed at t={}ms", at_ms);
            }
            AppEvent::PressPublished { at_ms } => {
                info!("PUB   | delivered press t={}ms", at_ms);
            }
            AppEvent::PublishFailed { at_ms, error } => {
                warn!("PUB   | dropped press t={}ms ({})", at_ms, error);
            }
        }
    }
}
