//! Configuration type definitions
//!
//! The device configuration, stored in flash as postcard-serialized binary
//! data or TOML text, with compiled-in defaults.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::hardware::{
    DisplayHwConfig, PumpsConfig, SensorsConfig, TouchHwConfig, GPIO_COUNT, PANEL_PINS,
    SPI_BUS_PINS,
};
use crate::schedule::{ScheduleDuration, MAX_TOTAL_HOURS};

/// Current configuration layout version
pub const CONFIG_VERSION: u8 = 1;

/// Water-change sequencer timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SequencerConfig {
    /// Float check cadence (ms)
    pub poll_interval_ms: u32,
    /// Pause between drain pump off and fill pump on (ms)
    pub settle_ms: u32,
    /// Longest allowed drain (seconds, 0 = unbounded)
    pub drain_timeout_s: u32,
    /// Longest allowed refill (seconds, 0 = unbounded)
    pub fill_timeout_s: u32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            settle_ms: 500,
            drain_timeout_s: 1200,
            fill_timeout_s: 1200,
        }
    }
}

/// Touch UI timing and limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UiConfig {
    /// Auto-repeat cadence for held +/- buttons (ms)
    pub repeat_interval_ms: u32,
    /// Touch sampling period (ms)
    pub touch_poll_ms: u32,
    /// Upper bound for the schedule editor (hours)
    pub max_total_hours: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            repeat_interval_ms: 100,
            touch_poll_ms: 20,
            max_total_hours: MAX_TOTAL_HOURS,
        }
    }
}

/// Power-on values of the operator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DefaultsConfig {
    pub ato_enabled: bool,
    pub awc_automatic: bool,
    pub total_hours: u16,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            ato_enabled: true,
            awc_automatic: true,
            total_hours: 1,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Layout version
    pub version: u8,
    pub pumps: PumpsConfig,
    pub sensors: SensorsConfig,
    pub sequencer: SequencerConfig,
    pub ui: UiConfig,
    pub defaults: DefaultsConfig,
    pub display: DisplayHwConfig,
    pub touch: TouchHwConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// Float poll interval is zero
    ZeroPollInterval,
    /// Auto-repeat interval is zero
    ZeroRepeatInterval,
    /// Touch sampling period is zero
    ZeroTouchPoll,
    /// Default schedule exceeds the editor bound
    DefaultHoursOutOfRange,
    /// Display has a zero dimension
    ZeroDisplaySize,
    /// Pump or float pin is not a GPIO
    PinOutOfRange(u8),
    /// Pump or float pin belongs to an SPI bus
    BusPin(u8),
    /// Pump or float pin drives the panel
    PanelPin(u8),
    /// Two pumps/floats share a pin
    PinConflict(u8),
}

impl DeviceConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            pumps: PumpsConfig::default(),
            sensors: SensorsConfig::default(),
            sequencer: SequencerConfig::default(),
            ui: UiConfig::default(),
            defaults: DefaultsConfig::default(),
            display: DisplayHwConfig::default(),
            touch: TouchHwConfig::default(),
        }
    }

    /// Check value ranges and pin conflicts
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sequencer.poll_interval_ms == 0 {
            return Err(ValidationError::ZeroPollInterval);
        }
        if self.ui.repeat_interval_ms == 0 {
            return Err(ValidationError::ZeroRepeatInterval);
        }
        if self.ui.touch_poll_ms == 0 {
            return Err(ValidationError::ZeroTouchPoll);
        }
        if self.defaults.total_hours > self.ui.max_total_hours {
            return Err(ValidationError::DefaultHoursOutOfRange);
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ValidationError::ZeroDisplaySize);
        }
        self.validate_pins()
    }

    /// Pump and float pins must be free GPIOs, each used once
    fn validate_pins(&self) -> Result<(), ValidationError> {
        let pins = self.fluid_pins();
        for (i, &pin) in pins.iter().enumerate() {
            if pin >= GPIO_COUNT {
                return Err(ValidationError::PinOutOfRange(pin));
            }
            if SPI_BUS_PINS.contains(&pin) {
                return Err(ValidationError::BusPin(pin));
            }
            if PANEL_PINS.contains(&pin) {
                return Err(ValidationError::PanelPin(pin));
            }
            if pins[..i].contains(&pin) {
                return Err(ValidationError::PinConflict(pin));
            }
        }
        Ok(())
    }

    /// Drain, fill, bottom and top pin numbers
    pub fn fluid_pins(&self) -> [u8; 4] {
        [
            self.pumps.drain.pin,
            self.pumps.fill.pin,
            self.sensors.bottom.pin,
            self.sensors.top.pin,
        ]
    }

    /// Schedule at power-on
    pub fn initial_schedule(&self) -> ScheduleDuration {
        ScheduleDuration::new(self.defaults.total_hours, self.ui.max_total_hours)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PinConfig;

    #[test]
    fn test_default_config_is_valid() {
        let config = DeviceConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.defaults.ato_enabled);
        assert!(config.defaults.awc_automatic);
        assert_eq!(config.initial_schedule().total_hours(), 1);
    }

    #[test]
    fn test_validate_rejects_zero_poll() {
        let mut config = DeviceConfig::default();
        config.sequencer.poll_interval_ms = 0;
        assert_eq!(config.validate(), Err(ValidationError::ZeroPollInterval));
    }

    #[test]
    fn test_validate_rejects_shared_pump_pin() {
        let mut config = DeviceConfig::default();
        config.pumps.fill = PinConfig::new(config.pumps.drain.pin);
        assert_eq!(config.validate(), Err(ValidationError::PinConflict(13)));
    }

    #[test]
    fn test_validate_rejects_float_on_pump_pin() {
        let mut config = DeviceConfig::default();
        config.sensors.top = PinConfig::with_pullup(config.pumps.drain.pin);
        assert_eq!(config.validate(), Err(ValidationError::PinConflict(13)));
    }

    #[test]
    fn test_validate_rejects_bus_and_panel_pins() {
        let mut config = DeviceConfig::default();
        config.sensors.top = PinConfig::with_pullup(18);
        assert_eq!(config.validate(), Err(ValidationError::BusPin(18)));

        let mut config = DeviceConfig::default();
        config.pumps.fill = PinConfig::new(17);
        assert_eq!(config.validate(), Err(ValidationError::PanelPin(17)));

        let mut config = DeviceConfig::default();
        config.pumps.drain = PinConfig::inverted(30);
        assert_eq!(config.validate(), Err(ValidationError::PinOutOfRange(30)));
    }

    #[test]
    fn test_default_pins_clear_of_board_wiring() {
        for pin in DeviceConfig::default().fluid_pins() {
            assert!(pin < GPIO_COUNT);
            assert!(!SPI_BUS_PINS.contains(&pin));
            assert!(!PANEL_PINS.contains(&pin));
        }
    }

    #[test]
    fn test_validate_rejects_default_hours_over_bound() {
        let mut config = DeviceConfig::default();
        config.ui.max_total_hours = 10;
        config.defaults.total_hours = 11;
        assert_eq!(
            config.validate(),
            Err(ValidationError::DefaultHoursOutOfRange)
        );
    }
}
