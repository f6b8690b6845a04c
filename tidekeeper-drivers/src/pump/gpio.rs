//! GPIO pump output
//!
//! Drives a pump through a relay module, SSR or MOSFET on one GPIO pin.
//! Relay boards are often active-low, so the polarity is configurable.

use tidekeeper_core::config::PinConfig;
use tidekeeper_core::traits::Pump;
use tidekeeper_hal::OutputPin;

/// Pump switched by a single GPIO
pub struct GpioPump<P> {
    pin: P,
    /// If true, pump ON = pin LOW
    inverted: bool,
    /// Current logical state (true = pump running)
    running: bool,
}

impl<P: OutputPin> GpioPump<P> {
    /// Create a pump output, switched off
    ///
    /// - `inverted`: pump runs when the pin is LOW (active-low relay boards)
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut pump = Self {
            pin,
            inverted,
            running: false,
        };
        pump.set_running(false);
        pump
    }

    /// Create from a pin configuration (`!gpioN` = active-low)
    pub fn from_config(pin: P, config: &PinConfig) -> Self {
        Self::new(pin, config.inverted)
    }

    /// Release the pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> Pump for GpioPump<P> {
    fn set_running(&mut self, running: bool) {
        self.running = running;
        // Active-high: running → HIGH. Active-low: running → LOW.
        self.pin.set_state(running != self.inverted);
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
        writes: u32,
    }

    impl MockPin {
        fn new(high: bool) -> Self {
            Self { high, writes: 0 }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
            self.writes += 1;
        }

        fn set_low(&mut self) {
            self.high = false;
            self.writes += 1;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_high_pump() {
        let mut pump = GpioPump::new(MockPin::new(true), false);

        // Forced off at construction
        assert!(!pump.is_running());
        assert!(!pump.pin.is_set_high());

        pump.set_running(true);
        assert!(pump.is_running());
        assert!(pump.pin.is_set_high());

        pump.set_running(false);
        assert!(!pump.pin.is_set_high());
    }

    #[test]
    fn test_active_low_pump() {
        let mut pump = GpioPump::from_config(MockPin::new(false), &PinConfig::inverted(13));

        // Off means the pin idles high
        assert!(pump.pin.is_set_high());

        pump.set_running(true);
        assert!(pump.is_running());
        assert!(!pump.pin.is_set_high());

        let pin = pump.release();
        assert_eq!(pin.writes, 2);
    }
}
