//! MQTT session adapter.
//!
//! Implements [`SessionPort`] over the ESP-IDF MQTT client. The client
//! delivers connection events from its own task; this adapter folds them
//! into an atomic liveness flag so the single-threaded agent loop can ask
//! `is_alive()` without blocking. Keep-alives are serviced by the client's
//! task, so [`SessionPort::poll`] reduces to a liveness check here.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::mqtt::client::EspMqttClient`.
//! - **all other targets**: simulation with scripted-failure hooks for
//!   host-side tests.
//!
//! Session teardown is a cold restart: `disconnect()` drops the whole
//! client, and the next `connect()` builds a fresh one under a fresh
//! client id.

use log::{info, warn};

use crate::app::ports::{LinkError, SessionPort};

/// How long a session handshake may take before the attempt is abandoned.
#[cfg(target_os = "espidf")]
const CONNECT_WAIT_MS: u32 = 10_000;
#[cfg(target_os = "espidf")]
const CONNECT_POLL_MS: u32 = 100;

pub struct MqttAdapter {
    broker_host: heapless::String<64>,
    broker_port: u16,

    #[cfg(target_os = "espidf")]
    client: Option<esp_idf_svc::mqtt::client::EspMqttClient<'static>>,
    #[cfg(target_os = "espidf")]
    session_alive: std::sync::Arc<core::sync::atomic::AtomicBool>,

    #[cfg(not(target_os = "espidf"))]
    sim: SimSession,
}

impl MqttAdapter {
    pub fn new(broker_host: heapless::String<64>, broker_port: u16) -> Self {
        Self {
            broker_host,
            broker_port,

            #[cfg(target_os = "espidf")]
            client: None,
            #[cfg(target_os = "espidf")]
            session_alive: std::sync::Arc::new(core::sync::atomic::AtomicBool::new(false)),

            #[cfg(not(target_os = "espidf"))]
            sim: SimSession::default(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF implementation
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl SessionPort for MqttAdapter {
    fn connect(&mut self, client_id: &str) -> Result<(), LinkError> {
        use core::sync::atomic::Ordering;
        use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration};

        self.disconnect();

        let url = format!("mqtt://{}:{}", self.broker_host, self.broker_port);
        let conf = MqttClientConfiguration {
            client_id: Some(client_id),
            ..Default::default()
        };

        self.session_alive.store(false, Ordering::Release);
        let alive = self.session_alive.clone();

        // The callback runs on the client's own task; the flag is the only
        // state shared with the agent loop.
        let client = EspMqttClient::new_cb(&url, &conf, move |event| match event.payload() {
            EventPayload::Connected(_) => alive.store(true, Ordering::Release),
            EventPayload::Disconnected => alive.store(false, Ordering::Release),
            _ => {}
        })
        .map_err(|e| {
            warn!("MQTT: client construction failed ({})", e);
            LinkError::SessionConnectFailed
        })?;

        // The handshake completes asynchronously; give it a bounded wait.
        let mut waited: u32 = 0;
        while !self.session_alive.load(Ordering::Acquire) {
            if waited >= CONNECT_WAIT_MS {
                warn!("MQTT: broker handshake timed out");
                return Err(LinkError::SessionConnectFailed);
            }
            esp_idf_hal::delay::FreeRtos::delay_ms(CONNECT_POLL_MS);
            waited += CONNECT_POLL_MS;
        }

        info!("MQTT: session up at {} as '{}'", url, client_id);
        self.client = Some(client);
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError> {
        use esp_idf_svc::mqtt::client::QoS;

        let Some(client) = self.client.as_mut() else {
            return Err(LinkError::NotConnected);
        };
        client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .map(|_| ())
            .map_err(|e| {
                warn!("MQTT: publish to '{}' failed ({})", topic, e);
                LinkError::PublishRejected
            })
    }

    fn poll(&mut self) -> Result<(), LinkError> {
        // Keep-alive traffic runs on the client's task; a cleared flag
        // means the broker dropped us.
        if self.is_alive() {
            Ok(())
        } else {
            Err(LinkError::SessionLost)
        }
    }

    fn is_alive(&self) -> bool {
        self.client.is_some()
            && self
                .session_alive
                .load(core::sync::atomic::Ordering::Acquire)
    }

    fn disconnect(&mut self) {
        if self.client.take().is_some() {
            info!("MQTT: session torn down");
        }
        self.session_alive
            .store(false, core::sync::atomic::Ordering::Release);
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
struct SimSession {
    alive: bool,
    fail_next_connect: bool,
    fail_next_publish: bool,
    last_client_id: Option<String>,
    published: Vec<(String, Vec<u8>)>,
}

#[cfg(not(target_os = "espidf"))]
impl MqttAdapter {
    /// Scripted failure: the next `connect` is refused.
    pub fn sim_fail_next_connect(&mut self) {
        self.sim.fail_next_connect = true;
    }

    /// Scripted failure: the next `publish` is rejected.
    pub fn sim_fail_next_publish(&mut self) {
        self.sim.fail_next_publish = true;
    }

    /// Simulate a broker-initiated disconnect.
    pub fn sim_drop_session(&mut self) {
        self.sim.alive = false;
    }

    pub fn sim_published(&self) -> &[(String, Vec<u8>)] {
        &self.sim.published
    }

    pub fn sim_last_client_id(&self) -> Option<&str> {
        self.sim.last_client_id.as_deref()
    }
}

#[cfg(not(target_os = "espidf"))]
impl SessionPort for MqttAdapter {
    fn connect(&mut self, client_id: &str) -> Result<(), LinkError> {
        self.sim.last_client_id = Some(client_id.to_string());
        if self.sim.fail_next_connect {
            self.sim.fail_next_connect = false;
            warn!("MQTT(sim): scripted connect failure");
            return Err(LinkError::SessionConnectFailed);
        }
        self.sim.alive = true;
        info!(
            "MQTT(sim): session up at {}:{} as '{}'",
            self.broker_host, self.broker_port, client_id
        );
        Ok(())
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError> {
        if !self.sim.alive {
            return Err(LinkError::NotConnected);
        }
        if self.sim.fail_next_publish {
            self.sim.fail_next_publish = false;
            warn!("MQTT(sim): scripted publish failure");
            return Err(LinkError::PublishRejected);
        }
        self.sim.published.push((topic.to_string(), payload.to_vec()));
        Ok(())
    }

    fn poll(&mut self) -> Result<(), LinkError> {
        if self.sim.alive {
            Ok(())
        } else {
            Err(LinkError::SessionLost)
        }
    }

    fn is_alive(&self) -> bool {
        self.sim.alive
    }

    fn disconnect(&mut self) {
        self.sim.alive = false;
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    fn adapter() -> MqttAdapter {
        let mut host = heapless::String::new();
        host.push_str("broker.local").unwrap();
        MqttAdapter::new(host, 1883)
    }

    #[test]
    fn connect_publish_roundtrip() {
        let mut a = adapter();
        a.connect("node-0001").unwrap();
        assert!(a.is_alive());
        a.publish("t/button", b"{}").unwrap();
        assert_eq!(a.sim_published().len(), 1);
        assert_eq!(a.sim_last_client_id(), Some("node-0001"));
    }

    #[test]
    fn publish_without_session_is_refused() {
        let mut a = adapter();
        assert_eq!(a.publish("t", b"x"), Err(LinkError::NotConnected));
    }

    #[test]
    fn scripted_connect_failure_then_recovery() {
        let mut a = adapter();
        a.sim_fail_next_connect();
        assert_eq!(a.connect("id-1"), Err(LinkError::SessionConnectFailed));
        assert!(!a.is_alive());
        a.connect("id-2").unwrap();
        assert!(a.is_alive());
    }

    #[test]
    fn dropped_session_fails_poll() {
        let mut a = adapter();
        a.connect("id").unwrap();
        assert!(a.poll().is_ok());
        a.sim_drop_session();
        assert_eq!(a.poll(), Err(LinkError::SessionLost));
    }

    #[test]
    fn disconnect_kills_liveness() {
        let mut a = adapter();
        a.connect("id").unwrap();
        a.disconnect();
        assert!(!a.is_alive());
    }
}
