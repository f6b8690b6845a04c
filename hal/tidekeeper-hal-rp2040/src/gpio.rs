//! GPIO wrappers implementing the `tidekeeper-hal` pin traits

use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pull};
use embassy_rp::Peri;

/// Push-pull output
pub struct RpOutput {
    pin: Output<'static>,
}

impl RpOutput {
    pub fn new(pin: Peri<'static, AnyPin>, initial_high: bool) -> Self {
        Self {
            pin: Output::new(pin, Level::from(initial_high)),
        }
    }
}

impl tidekeeper_hal::OutputPin for RpOutput {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Digital input with optional pull-up
pub struct RpInput {
    pin: Input<'static>,
}

impl RpInput {
    pub fn new(pin: Peri<'static, AnyPin>, pull_up: bool) -> Self {
        let pull = if pull_up { Pull::Up } else { Pull::None };
        Self {
            pin: Input::new(pin, pull),
        }
    }
}

impl tidekeeper_hal::InputPin for RpInput {
    fn is_high(&mut self) -> bool {
        self.pin.is_high()
    }
}
