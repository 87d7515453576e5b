//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements               | Connects to               |
//! |-------------|--------------------------|---------------------------|
//! | `delay`     | DelayPort                | FreeRTOS / host sleep     |
//! | `device_id` | —                        | eFuse factory MAC         |
//! | `hardware`  | InputPort, IndicatorPort | embedded-hal digital pins |
//! | `log_sink`  | EventSink                | Serial log output         |
//! | `mqtt`      | SessionPort              | ESP-IDF MQTT client       |
//! | `nvs`       | ConfigPort               | NVS / in-memory store     |
//! | `time`      | —                        | ESP system timer          |
//! | `wifi`      | NetworkPort              | ESP-IDF WiFi STA          |

pub mod delay;
pub mod device_id;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod nvs;
pub mod time;
pub mod wifi;
