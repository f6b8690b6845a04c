//! Hardware configuration types
//!
//! Pin assignments and peripheral parameters for pumps, floats, the panel
//! and the touch controller.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }
}

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// Pins owned by the panel and touch SPI buses
pub const SPI_BUS_PINS: [u8; 6] = [10, 11, 12, 16, 18, 19];

/// Panel control lines: touch CS, LCD CS, DC, RST, backlight
pub const PANEL_PINS: [u8; 5] = [9, 17, 20, 21, 22];

/// Drain and fill pump outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PumpsConfig {
    pub drain: PinConfig,
    pub fill: PinConfig,
}

impl Default for PumpsConfig {
    fn default() -> Self {
        Self {
            drain: PinConfig::new(13),
            fill: PinConfig::new(14),
        }
    }
}

/// Float switch inputs (active-low, pulled up)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorsConfig {
    /// Signals the tank is drained
    pub bottom: PinConfig,
    /// Signals the tank is full
    pub top: PinConfig,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            bottom: PinConfig::with_pullup(26),
            top: PinConfig::with_pullup(27),
        }
    }
}

/// TFT panel parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayHwConfig {
    /// Width in pixels (portrait)
    pub width: u16,
    /// Height in pixels (portrait)
    pub height: u16,
    /// SPI clock in Hz
    pub spi_hz: u32,
}

impl Default for DisplayHwConfig {
    fn default() -> Self {
        Self {
            width: 240,
            height: 320,
            spi_hz: 32_000_000,
        }
    }
}

/// Touch controller parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TouchHwConfig {
    /// Minimum pressure reading that counts as a touch
    pub pressure_threshold: u16,
    /// Samples averaged per reading
    pub samples: u8,
    /// Run the calibration procedure even when a stored blob exists
    pub recalibrate: bool,
    /// SPI clock in Hz
    pub spi_hz: u32,
}

impl Default for TouchHwConfig {
    fn default() -> Self {
        Self {
            pressure_threshold: 600,
            samples: 4,
            recalibrate: false,
            spi_hz: 2_000_000,
        }
    }
}
