//! Blocking delay adapter.
//!
//! Implements [`DelayPort`] for the tick cadence and the reconnect
//! backoff. On the device this yields to FreeRTOS so the idle task and
//! the MQTT client task keep running; on the host it is a plain sleep.

use crate::app::ports::DelayPort;

pub struct TickDelay;

impl TickDelay {
    pub fn new() -> Self {
        Self
    }
}

impl DelayPort for TickDelay {
    #[cfg(target_os = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
