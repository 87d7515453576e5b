//! Agent configuration parameters
//!
//! All tunable parameters for the ButtonLink agent. Values can be
//! provisioned into NVS (non-volatile storage) and are loaded once at boot;
//! after validation they are immutable for the life of the process.

use serde::{Deserialize, Serialize};

/// Core agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    // --- Network ---
    /// Access point SSID.
    pub wifi_ssid: heapless::String<32>,
    /// Access point passphrase (empty for an open network).
    pub wifi_password: heapless::String<64>,

    // --- Broker ---
    /// Broker host name or address.
    pub broker_host: heapless::String<64>,
    /// Broker TCP port.
    pub broker_port: u16,
    /// Topic every press is published to.
    pub topic: heapless::String<64>,
    /// Device identifier reported in the payload and used as the client-id
    /// base. Empty = derive from the factory MAC at boot.
    pub device_id: heapless::String<32>,

    // --- Timing ---
    /// Minimum hold time before a raw level is believed (milliseconds).
    pub debounce_window_ms: u32,
    /// Wait between failed reconnection attempts (milliseconds).
    pub reconnect_backoff_ms: u32,
    /// Agent loop cadence (milliseconds).
    pub tick_interval_ms: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let mut topic = heapless::String::new();
        let _ = topic.push_str("esp8266/button");
        let mut device_id = heapless::String::new();
        let _ = device_id.push_str("esp8266_lolin");
        let mut broker_host = heapless::String::new();
        let _ = broker_host.push_str("192.168.1.100");

        Self {
            wifi_ssid: heapless::String::new(),
            wifi_password: heapless::String::new(),

            broker_host,
            broker_port: 1883,
            topic,
            device_id,

            debounce_window_ms: 50,
            reconnect_backoff_ms: 5000,
            tick_interval_ms: 10,
        }
    }
}

impl AgentConfig {
    /// Range-check the configuration.
    ///
    /// Called once at process start; a failure here is fatal by design — a
    /// zero settling window or an empty topic must never reach the loop.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.debounce_window_ms == 0 || self.debounce_window_ms > 10_000 {
            return Err("debounce_window_ms must be 1–10000");
        }
        if self.tick_interval_ms == 0 || self.tick_interval_ms > 1000 {
            return Err("tick_interval_ms must be 1–1000");
        }
        if !(100..=600_000).contains(&self.reconnect_backoff_ms) {
            return Err("reconnect_backoff_ms must be 100–600000");
        }
        if self.broker_port == 0 {
            return Err("broker_port must be non-zero");
        }
        if self.broker_host.is_empty() {
            return Err("broker_host must not be empty");
        }
        if self.topic.is_empty() {
            return Err("topic must not be empty");
        }
        if self.device_id.is_empty() {
            return Err("device_id must not be empty");
        }
        Ok(())
    }
}
