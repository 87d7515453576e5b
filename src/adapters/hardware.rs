//! Hardware adapter — bridges real pins to domain port traits.
//!
//! Generic over the `embedded-hal 1.0` digital traits, so the same adapter
//! drives an ESP-IDF `PinDriver` on the device and a mock pin in host
//! tests. This is the only module in the system that touches pin state.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{IndicatorPort, InputPort};

/// Concrete adapter combining the button line and the indicator LED.
pub struct HardwareAdapter<I: InputPin, O: OutputPin> {
    button: I,
    led: O,
    led_on: bool,
}

impl<I: InputPin, O: OutputPin> HardwareAdapter<I, O> {
    pub fn new(button: I, led: O) -> Self {
        Self {
            button,
            led,
            led_on: false,
        }
    }
}

// ── InputPort implementation ──────────────────────────────────

impl<I: InputPin, O: OutputPin> InputPort for HardwareAdapter<I, O> {
    fn read_raw_level(&mut self) -> bool {
        // A failed read degrades to the pulled-up idle level: a transient
        // bus error must never fabricate a press.
        self.button.is_high().unwrap_or(true)
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<I: InputPin, O: OutputPin> IndicatorPort for HardwareAdapter<I, O> {
    fn toggle_indicator(&mut self) {
        self.led_on = !self.led_on;
        let result = if self.led_on {
            self.led.set_high()
        } else {
            self.led.set_low()
        };
        if result.is_err() {
            // Cosmetic output; never let it affect publishing.
            warn!("indicator write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    struct SimPin {
        high: bool,
        writes: u32,
    }

    impl embedded_hal::digital::ErrorType for SimPin {
        type Error = Infallible;
    }

    impl InputPin for SimPin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    impl OutputPin for SimPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn reads_raw_electrical_level() {
        let button = SimPin { high: true, writes: 0 };
        let led = SimPin { high: false, writes: 0 };
        let mut hw = HardwareAdapter::new(button, led);
        assert!(hw.read_raw_level());
        hw.button.high = false;
        assert!(!hw.read_raw_level());
    }

    #[test]
    fn toggle_alternates_led() {
        let button = SimPin { high: true, writes: 0 };
        let led = SimPin { high: false, writes: 0 };
        let mut hw = HardwareAdapter::new(button, led);
        hw.toggle_indicator();
        assert!(hw.led.high);
        hw.toggle_indicator();
        assert!(!hw.led.high);
        assert_eq!(hw.led.writes, 2);
    }
}
