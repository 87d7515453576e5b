//! ButtonLink Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single cooperative loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter   WifiAdapter   MqttAdapter   NvsConfigStore│
//! │  (Input+Indicator) (NetworkPort) (SessionPort) (ConfigPort)  │
//! │  MonotonicClock    TickDelay     LogEventSink                │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │             AgentService (pure logic)              │      │
//! │  │  debounce · connectivity state machine · encode    │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Result, anyhow};
use log::{info, warn};

use buttonlink::adapters::delay::TickDelay;
use buttonlink::adapters::device_id;
use buttonlink::adapters::hardware::HardwareAdapter;
use buttonlink::adapters::log_sink::LogEventSink;
use buttonlink::adapters::mqtt::MqttAdapter;
use buttonlink::adapters::nvs::NvsConfigStore;
use buttonlink::adapters::time::MonotonicClock;
use buttonlink::adapters::wifi::WifiAdapter;
use buttonlink::app::ports::{ConfigError, ConfigPort, DelayPort};
use buttonlink::app::service::AgentService;
use buttonlink::config::AgentConfig;
use buttonlink::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("ButtonLink v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let mut config = match NvsConfigStore::new() {
        Ok(store) => match store.load() {
            Ok(cfg) => {
                info!("Config loaded from NVS");
                cfg
            }
            Err(ConfigError::NotFound) => {
                info!("No provisioned config, using defaults");
                AgentConfig::default()
            }
            Err(e) => {
                warn!("Config load failed ({}), using defaults", e);
                AgentConfig::default()
            }
        },
        Err(e) => {
            warn!("NVS init failed ({}), using defaults and no provisioning", e);
            AgentConfig::default()
        }
    };

    // ── 2b. Device identity fallback ──────────────────────────
    if config.device_id.is_empty() {
        let derived = device_id::device_id(&device_id::read_mac());
        let _ = config.device_id.push_str(derived.as_str());
    }

    // Misconfiguration is fatal at startup, never mid-run.
    config
        .validate()
        .map_err(|msg| anyhow!("invalid configuration: {}", msg))?;
    info!(
        "Device '{}' → {}:{} topic '{}'",
        config.device_id, config.broker_host, config.broker_port, config.topic
    );

    // ── 3. Construct adapters ─────────────────────────────────
    let peripherals = esp_idf_hal::peripherals::Peripherals::take()
        .map_err(|e| anyhow!("peripherals: {}", e))?;
    let mut button = esp_idf_hal::gpio::PinDriver::input(peripherals.pins.gpio5)
        .map_err(|e| anyhow!("button pin: {}", e))?;
    button
        .set_pull(esp_idf_hal::gpio::Pull::Up)
        .map_err(|e| anyhow!("button pull-up: {}", e))?;
    let led = esp_idf_hal::gpio::PinDriver::output(peripherals.pins.gpio2)
        .map_err(|e| anyhow!("status led pin: {}", e))?;
    info!(
        "Button on GPIO{}, indicator on GPIO{}",
        pins::BUTTON_GPIO,
        pins::STATUS_LED_GPIO
    );

    let mut hw = HardwareAdapter::new(button, led);
    let mut wifi = WifiAdapter::new(config.wifi_ssid.as_str(), config.wifi_password.as_str())
        .map_err(|msg| anyhow!("invalid WiFi credentials: {}", msg))?;
    let mut mqtt = MqttAdapter::new(config.broker_host.clone(), config.broker_port);
    let mut delay = TickDelay::new();
    let mut sink = LogEventSink::new();
    let clock = MonotonicClock::new();

    // ── 4. Agent loop ─────────────────────────────────────────
    let mut agent = AgentService::new(&config);
    agent.start(&mut sink);
    info!("System ready. Entering agent loop.");

    loop {
        let now_ms = clock.now_ms();
        agent.tick(now_ms, &mut hw, &mut wifi, &mut mqtt, &mut delay, &mut sink);
        delay.delay_ms(config.tick_interval_ms);
    }
}
