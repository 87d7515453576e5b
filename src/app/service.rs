//! Agent service — the hexagonal core.
//!
//! [`AgentService`] owns the debounce detector and the connectivity
//! manager and runs one full agent cycle per tick. All I/O flows through
//! port traits injected at call sites, making the entire service testable
//! with mock adapters.
//!
//! ```text
//!   InputPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                 │       AgentService          │
//!  NetworkPort ◀──│  debounce · link · encode   │──▶ IndicatorPort
//!  SessionPort ◀──│                             │
//!                 └────────────────────────────┘
//! ```

use log::info;

use crate::config::AgentConfig;
use crate::drivers::button::{DebounceDetector, InputSample};
use crate::link::manager::{ConnectivityManager, LinkState};
use crate::link::payload::encode_press;

use super::events::AppEvent;
use super::ports::{DelayPort, EventSink, IndicatorPort, InputPort, NetworkPort, SessionPort};

/// Publish outcome counters, for observability only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishStats {
    pub published: u32,
    pub failed: u32,
}

/// The application service orchestrates one agent cycle per tick.
pub struct AgentService {
    detector: DebounceDetector,
    link: ConnectivityManager,
    topic: heapless::String<64>,
    device_id: heapless::String<32>,
    stats: PublishStats,
}

impl AgentService {
    /// Construct the service from already-validated configuration.
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            detector: DebounceDetector::new(u64::from(config.debounce_window_ms)),
            link: ConnectivityManager::new(
                config.device_id.clone(),
                config.reconnect_backoff_ms,
            ),
            topic: config.topic.clone(),
            device_id: config.device_id.clone(),
            stats: PublishStats::default(),
        }
    }

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!("AgentService started, topic '{}'", self.topic);
    }

    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    pub fn stats(&self) -> PublishStats {
        self.stats
    }

    /// Run one full agent cycle: maintain link → sample → debounce →
    /// encode → publish.
    ///
    /// `now_ms` is monotonic milliseconds since agent start. The `hw`
    /// parameter satisfies **both** [`InputPort`] and [`IndicatorPort`] —
    /// this avoids a double mutable borrow while keeping the port boundary
    /// explicit.
    ///
    /// Publishing may suspend the loop inside the reconnection ladder;
    /// presses during that window are lost, which is the documented
    /// trade-off of a best-effort single-threaded telemetry node.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl InputPort + IndicatorPort),
        net: &mut impl NetworkPort,
        session: &mut impl SessionPort,
        delay: &mut impl DelayPort,
        sink: &mut impl EventSink,
    ) {
        // 1. Service the link on every tick, pending events or not.
        let before = self.link.state();
        self.link.maintain(net, session);
        self.emit_link_change(before, sink);

        // 2–3. Sample the line and run the settling window.
        let sample = InputSample {
            raw_high: hw.read_raw_level(),
            at_ms: now_ms,
        };
        let Some(transition) = self.detector.observe(sample) else {
            return;
        };
        sink.emit(&AppEvent::PressDetected { at_ms: transition.at_ms });

        // 4. Encode and publish — at most once per confirmed edge.
        let payload = encode_press(self.device_id.as_str(), transition.at_ms);
        let before = self.link.state();
        let outcome = self.link.publish(
            self.topic.as_str(),
            payload.as_bytes(),
            net,
            session,
            delay,
        );
        self.emit_link_change(before, sink);

        match outcome {
            Ok(()) => {
                self.stats.published += 1;
                hw.toggle_indicator();
                sink.emit(&AppEvent::PressPublished { at_ms: transition.at_ms });
            }
            Err(error) => {
                // Drop the event: no queue, no retry. The counter and the
                // sink record that it happened.
                self.stats.failed += 1;
                sink.emit(&AppEvent::PublishFailed { at_ms: transition.at_ms, error });
            }
        }
    }

    fn emit_link_change(&self, before: LinkState, sink: &mut impl EventSink) {
        let after = self.link.state();
        if after != before {
            sink.emit(&AppEvent::LinkChanged { from: before, to: after });
        }
    }
}
