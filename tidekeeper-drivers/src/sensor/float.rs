//! Float switch on a GPIO input
//!
//! Float switches close to ground when the float is triggered and are read
//! through a pull-up, so the line idles HIGH. Switches wired the other way
//! round are handled with the `inverted` flag, which restores the same
//! HIGH-means-idle convention for the controller.

use tidekeeper_core::config::PinConfig;
use tidekeeper_core::traits::LevelSensor;
use tidekeeper_hal::InputPin;

/// Float switch read from one GPIO
pub struct FloatSwitch<P> {
    pin: P,
    inverted: bool,
}

impl<P: InputPin> FloatSwitch<P> {
    pub fn new(pin: P, inverted: bool) -> Self {
        Self { pin, inverted }
    }

    /// Create from a pin configuration (`!` prefix inverts)
    pub fn from_config(pin: P, config: &PinConfig) -> Self {
        Self::new(pin, config.inverted)
    }

    /// Float is in its triggered position
    pub fn is_triggered(&mut self) -> bool {
        !self.is_high()
    }
}

impl<P: InputPin> LevelSensor for FloatSwitch<P> {
    fn is_high(&mut self) -> bool {
        self.pin.is_high() != self.inverted
    }
}
