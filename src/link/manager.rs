//! Connectivity manager — the link-resilience state machine.
//!
//! Owns the lifecycle policy for the two stacked sessions (network
//! association, broker session) and gives the agent loop a single
//! publish-or-fail capability.
//!
//! ```text
//! Disconnected ──network assoc──▶ NetworkUp ──broker session──▶ SessionUp
//!       ▲                             │                             │
//!       └──────────── any detected failure (cold reset) ────────────┘
//! ```
//!
//! ## Reconnection policy
//!
//! [`publish`](ConnectivityManager::publish) drives the ladder synchronously,
//! with a fixed wait between failed attempts and no attempt limit — a
//! long-lived telemetry node keeps trying rather than giving up.
//! [`maintain`](ConnectivityManager::maintain) never dials: it services
//! keep-alives and demotes the state when the link has died, so the agent
//! loop has exactly one suspension point.
//!
//! Both underlying sessions are collaborator-owned and restarted cold: a
//! failure anywhere collapses straight to `Disconnected`, never to
//! `NetworkUp`.

use core::fmt::Write as _;

use log::{info, warn};

use crate::app::ports::{DelayPort, LinkError, NetworkPort, SessionPort};

/// Link state. `SessionUp` implies the network layer is associated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    NetworkUp,
    SessionUp,
}

/// Scratch type for per-attempt broker client identifiers.
pub type ClientId = heapless::String<48>;

pub struct ConnectivityManager {
    state: LinkState,
    backoff_ms: u32,
    client_id_base: heapless::String<32>,
    session_seq: u16,
}

impl ConnectivityManager {
    pub fn new(device_id: heapless::String<32>, backoff_ms: u32) -> Self {
        Self {
            state: LinkState::Disconnected,
            backoff_ms,
            client_id_base: device_id,
            session_seq: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Service the link once per tick, pending events or not.
    ///
    /// In `SessionUp` this pumps the session's keep-alive machinery and
    /// checks liveness of both layers; a dead layer cold-resets the whole
    /// state so broker-initiated disconnects are noticed promptly rather
    /// than on the next publish.
    pub fn maintain(&mut self, net: &mut impl NetworkPort, session: &mut impl SessionPort) {
        match self.state {
            LinkState::SessionUp => {
                let healthy =
                    session.poll().is_ok() && session.is_alive() && net.is_connected();
                if !healthy {
                    warn!("Link: session lost, resetting");
                    session.disconnect();
                    self.state = LinkState::Disconnected;
                }
            }
            LinkState::NetworkUp => {
                if !net.is_connected() {
                    warn!("Link: network association lost");
                    self.state = LinkState::Disconnected;
                }
            }
            LinkState::Disconnected => {}
        }
    }

    /// Deliver `payload` to the broker, or say why not.
    ///
    /// Blocks the caller until `SessionUp` is reached (unbounded retries
    /// with backoff — the single suspension point in the system), then
    /// publishes exactly once. A rejected publish resets the link and
    /// surfaces the error; the caller owns the retry-or-drop decision.
    pub fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        net: &mut impl NetworkPort,
        session: &mut impl SessionPort,
        delay: &mut impl DelayPort,
    ) -> Result<(), LinkError> {
        self.ensure_session(net, session, delay);

        match session.publish(topic, payload) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("Link: publish failed ({}), resetting", e);
                session.disconnect();
                self.state = LinkState::Disconnected;
                Err(e)
            }
        }
    }

    /// Drive the reconnection ladder until `SessionUp`.
    fn ensure_session(
        &mut self,
        net: &mut impl NetworkPort,
        session: &mut impl SessionPort,
        delay: &mut impl DelayPort,
    ) {
        while self.state != LinkState::SessionUp {
            match self.state {
                LinkState::Disconnected => match net.connect() {
                    Ok(()) => {
                        info!("Link: network associated");
                        self.state = LinkState::NetworkUp;
                    }
                    Err(e) => {
                        warn!("Link: network connect failed ({}), retry in {}ms", e, self.backoff_ms);
                        delay.delay_ms(self.backoff_ms);
                    }
                },
                LinkState::NetworkUp => {
                    let client_id = self.next_client_id();
                    match session.connect(client_id.as_str()) {
                        Ok(()) => {
                            info!("Link: broker session up as '{}'", client_id);
                            self.state = LinkState::SessionUp;
                        }
                        Err(e) => {
                            warn!(
                                "Link: session connect failed ({}), retry in {}ms",
                                e, self.backoff_ms
                            );
                            if !net.is_connected() {
                                self.state = LinkState::Disconnected;
                            }
                            delay.delay_ms(self.backoff_ms);
                        }
                    }
                }
                LinkState::SessionUp => {}
            }
        }
    }

    /// Fresh identifier per session attempt so the broker never sees a
    /// stale duplicate of a half-dead predecessor.
    fn next_client_id(&mut self) -> ClientId {
        self.session_seq = self.session_seq.wrapping_add(1);
        let mut id = ClientId::new();
        let _ = write!(id, "{}-{:04x}", self.client_id_base, self.session_seq);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Scripted mock ports ───────────────────────────────────

    struct ScriptNet {
        /// Remaining connect attempts that fail before one succeeds.
        fail_connects: u32,
        connected: bool,
    }

    impl ScriptNet {
        fn up() -> Self {
            Self { fail_connects: 0, connected: true }
        }

        fn down_for(fail_connects: u32) -> Self {
            Self { fail_connects, connected: false }
        }
    }

    impl NetworkPort for ScriptNet {
        fn connect(&mut self) -> Result<(), LinkError> {
            if self.fail_connects > 0 {
                self.fail_connects -= 1;
                return Err(LinkError::NetworkConnectFailed);
            }
            self.connected = true;
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }

    struct ScriptSession {
        fail_connects: u32,
        fail_publishes: u32,
        poll_fails: bool,
        alive: bool,
        client_ids: Vec<String>,
        published: Vec<(String, Vec<u8>)>,
        disconnects: u32,
    }

    impl ScriptSession {
        fn new() -> Self {
            Self {
                fail_connects: 0,
                fail_publishes: 0,
                poll_fails: false,
                alive: false,
                client_ids: Vec::new(),
                published: Vec::new(),
                disconnects: 0,
            }
        }
    }

    impl SessionPort for ScriptSession {
        fn connect(&mut self, client_id: &str) -> Result<(), LinkError> {
            self.client_ids.push(client_id.to_string());
            if self.fail_connects > 0 {
                self.fail_connects -= 1;
                return Err(LinkError::SessionConnectFailed);
            }
            self.alive = true;
            Ok(())
        }

        fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError> {
            if self.fail_publishes > 0 {
                self.fail_publishes -= 1;
                return Err(LinkError::PublishRejected);
            }
            self.published.push((topic.to_string(), payload.to_vec()));
            Ok(())
        }

        fn poll(&mut self) -> Result<(), LinkError> {
            if self.poll_fails {
                Err(LinkError::SessionLost)
            } else {
                Ok(())
            }
        }

        fn is_alive(&self) -> bool {
            self.alive
        }

        fn disconnect(&mut self) {
            self.alive = false;
            self.disconnects += 1;
        }
    }

    struct CountDelay {
        sleeps: Vec<u32>,
    }

    impl CountDelay {
        fn new() -> Self {
            Self { sleeps: Vec::new() }
        }
    }

    impl DelayPort for CountDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.sleeps.push(ms);
        }
    }

    fn mgr() -> ConnectivityManager {
        let mut id = heapless::String::new();
        id.push_str("unit").unwrap();
        ConnectivityManager::new(id, 5000)
    }

    // ── Publish path ──────────────────────────────────────────

    #[test]
    fn publish_connects_both_layers_then_delivers() {
        let mut m = mgr();
        let mut net = ScriptNet::down_for(0);
        let mut session = ScriptSession::new();
        let mut delay = CountDelay::new();

        assert_eq!(m.state(), LinkState::Disconnected);
        m.publish("t/button", b"x", &mut net, &mut session, &mut delay)
            .unwrap();
        assert_eq!(m.state(), LinkState::SessionUp);
        assert_eq!(session.published.len(), 1);
        assert_eq!(session.published[0].0, "t/button");
        assert!(delay.sleeps.is_empty(), "no backoff on a clean connect");
    }

    #[test]
    fn network_failures_back_off_then_recover() {
        let mut m = mgr();
        let mut net = ScriptNet::down_for(3);
        let mut session = ScriptSession::new();
        let mut delay = CountDelay::new();

        m.publish("t", b"x", &mut net, &mut session, &mut delay).unwrap();
        assert_eq!(delay.sleeps, vec![5000, 5000, 5000]);
        assert_eq!(m.state(), LinkState::SessionUp);
    }

    #[test]
    fn session_failures_back_off_then_recover() {
        let mut m = mgr();
        let mut net = ScriptNet::up();
        let mut session = ScriptSession::new();
        session.fail_connects = 2;
        let mut delay = CountDelay::new();

        m.publish("t", b"x", &mut net, &mut session, &mut delay).unwrap();
        assert_eq!(delay.sleeps.len(), 2);
        assert_eq!(session.published.len(), 1);
    }

    #[test]
    fn publish_failure_resets_and_surfaces_error() {
        let mut m = mgr();
        let mut net = ScriptNet::up();
        let mut session = ScriptSession::new();
        session.fail_publishes = 1;
        let mut delay = CountDelay::new();

        let err = m
            .publish("t", b"x", &mut net, &mut session, &mut delay)
            .unwrap_err();
        assert_eq!(err, LinkError::PublishRejected);
        assert_eq!(m.state(), LinkState::Disconnected);
        assert_eq!(session.disconnects, 1, "failed publish cold-resets the session");
        assert!(session.published.is_empty(), "no internal retry of the same event");
    }

    #[test]
    fn client_id_is_fresh_per_attempt() {
        let mut m = mgr();
        let mut net = ScriptNet::up();
        let mut session = ScriptSession::new();
        session.fail_connects = 2;
        let mut delay = CountDelay::new();

        m.publish("t", b"x", &mut net, &mut session, &mut delay).unwrap();
        assert_eq!(session.client_ids.len(), 3);
        assert_eq!(session.client_ids[0], "unit-0001");
        assert_eq!(session.client_ids[1], "unit-0002");
        assert_eq!(session.client_ids[2], "unit-0003");
    }

    // ── Maintain path ─────────────────────────────────────────

    #[test]
    fn maintain_is_quiet_while_disconnected() {
        let mut m = mgr();
        let mut net = ScriptNet::down_for(99);
        let mut session = ScriptSession::new();
        m.maintain(&mut net, &mut session);
        assert_eq!(m.state(), LinkState::Disconnected);
        assert!(session.client_ids.is_empty(), "maintain never dials");
    }

    #[test]
    fn maintain_keeps_a_healthy_session() {
        let mut m = mgr();
        let mut net = ScriptNet::up();
        let mut session = ScriptSession::new();
        let mut delay = CountDelay::new();
        m.publish("t", b"x", &mut net, &mut session, &mut delay).unwrap();

        for _ in 0..10 {
            m.maintain(&mut net, &mut session);
        }
        assert_eq!(m.state(), LinkState::SessionUp);
    }

    #[test]
    fn maintain_resets_on_poll_failure() {
        let mut m = mgr();
        let mut net = ScriptNet::up();
        let mut session = ScriptSession::new();
        let mut delay = CountDelay::new();
        m.publish("t", b"x", &mut net, &mut session, &mut delay).unwrap();

        session.poll_fails = true;
        m.maintain(&mut net, &mut session);
        assert_eq!(m.state(), LinkState::Disconnected);
        assert_eq!(session.disconnects, 1);
    }

    #[test]
    fn maintain_resets_when_network_drops_under_session() {
        let mut m = mgr();
        let mut net = ScriptNet::up();
        let mut session = ScriptSession::new();
        let mut delay = CountDelay::new();
        m.publish("t", b"x", &mut net, &mut session, &mut delay).unwrap();

        net.connected = false;
        m.maintain(&mut net, &mut session);
        // Full collapse — never a partial regression to NetworkUp.
        assert_eq!(m.state(), LinkState::Disconnected);
    }
}
