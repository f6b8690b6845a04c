//! XPT2046 resistive touch controller driver
//!
//! The XPT2046 is a 12-bit ADC with a 4-wire touch screen front end. Each
//! conversion is one control byte followed by two bytes clocked out; the
//! 12-bit result sits left-aligned in those 16 bits with three trailing
//! zeros.
//!
//! # Pressure
//!
//! Contact pressure is estimated from the Z1/Z2 cross-plate measurements as
//! `z = z1 + 4095 - z2`, which grows with pressure. A reading below the
//! configured threshold is treated as "not touched".
//!
//! # Bus sharing
//!
//! The driver owns the SPI bus and drives chip select itself, so the panel
//! and the display sit on separate buses.

use embedded_hal::spi::SpiBus;
use tidekeeper_core::config::TouchHwConfig;
use tidekeeper_core::traits::{RawTouch, TouchError, TouchPanel};
use tidekeeper_hal::OutputPin;

/// Control bytes (start bit, channel select, 12-bit differential mode, power-down between conversions)
pub mod cmd {
    /// X position
    pub const READ_X: u8 = 0xD0;
    /// Y position
    pub const READ_Y: u8 = 0x90;
    /// Z1 pressure plate
    pub const READ_Z1: u8 = 0xB0;
    /// Z2 pressure plate
    pub const READ_Z2: u8 = 0xC0;
}

/// Full scale of a 12-bit conversion
const ADC_MAX: u16 = 4095;

/// XPT2046 configuration
#[derive(Debug, Clone, Copy)]
pub struct Xpt2046Config {
    /// Minimum pressure for a touch
    pub pressure_threshold: u16,
    /// Position samples averaged per reading (at least 1)
    pub samples: u8,
}

impl Default for Xpt2046Config {
    fn default() -> Self {
        Self {
            pressure_threshold: 600,
            samples: 4,
        }
    }
}

impl From<&TouchHwConfig> for Xpt2046Config {
    fn from(hw: &TouchHwConfig) -> Self {
        Self {
            pressure_threshold: hw.pressure_threshold,
            samples: hw.samples,
        }
    }
}

/// XPT2046 driver over a dedicated SPI bus
pub struct Xpt2046<SPI, CS> {
    spi: SPI,
    cs: CS,
    config: Xpt2046Config,
}

impl<SPI, CS> Xpt2046<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    pub fn new(spi: SPI, mut cs: CS, config: Xpt2046Config) -> Self {
        cs.set_high();
        Self { spi, cs, config }
    }

    pub fn config(&self) -> &Xpt2046Config {
        &self.config
    }

    /// Current pressure estimate
    pub fn read_pressure(&mut self) -> Result<u16, TouchError> {
        let z1 = self.read_channel(cmd::READ_Z1)?;
        let z2 = self.read_channel(cmd::READ_Z2)?;
        Ok(pressure(z1, z2))
    }

    /// One 12-bit conversion
    fn read_channel(&mut self, command: u8) -> Result<u16, TouchError> {
        let tx = [command, 0, 0];
        let mut rx = [0u8; 3];

        self.cs.set_low();
        let result = self.spi.transfer(&mut rx, &tx).and_then(|_| self.spi.flush());
        self.cs.set_high();
        result.map_err(|_| TouchError::Bus)?;

        Ok(u16::from_be_bytes([rx[1], rx[2]]) >> 3)
    }
}

impl<SPI, CS> TouchPanel for Xpt2046<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    fn read_raw(&mut self) -> Result<Option<RawTouch>, TouchError> {
        let z = self.read_pressure()?;
        if z < self.config.pressure_threshold {
            return Ok(None);
        }

        let samples = self.config.samples.max(1);
        let mut sum_x: u32 = 0;
        let mut sum_y: u32 = 0;
        for _ in 0..samples {
            sum_x += u32::from(self.read_channel(cmd::READ_X)?);
            sum_y += u32::from(self.read_channel(cmd::READ_Y)?);
        }

        // Lifted before the samples finished
        let z_end = self.read_pressure()?;
        if z_end < self.config.pressure_threshold {
            return Ok(None);
        }

        let n = u32::from(samples);
        Ok(Some(RawTouch {
            x: (sum_x / n) as u16,
            y: (sum_y / n) as u16,
            z: z.min(z_end),
        }))
    }
}

fn pressure(z1: u16, z2: u16) -> u16 {
    (z1 + ADC_MAX).saturating_sub(z2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::spi::ErrorType;

    /// SPI bus that answers each control byte with a fixed 12-bit value
    struct MockSpi {
        x: u16,
        y: u16,
        z1: u16,
        z2: u16,
        transfers: usize,
    }

    impl MockSpi {
        fn touching(x: u16, y: u16) -> Self {
            Self {
                x,
                y,
                z1: 400,
                z2: 2000,
                transfers: 0,
            }
        }

        fn idle() -> Self {
            Self {
                x: 0,
                y: 4095,
                z1: 0,
                z2: 4095,
                transfers: 0,
            }
        }
    }

    impl ErrorType for MockSpi {
        type Error = Infallible;
    }

    impl SpiBus<u8> for MockSpi {
        fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            words.fill(0);
            Ok(())
        }

        fn write(&mut self, _words: &[u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
            self.transfers += 1;
            let value = match write[0] {
                cmd::READ_X => self.x,
                cmd::READ_Y => self.y,
                cmd::READ_Z1 => self.z1,
                cmd::READ_Z2 => self.z2,
                _ => 0,
            };
            let bytes = (value << 3).to_be_bytes();
            read[0] = 0;
            read[1] = bytes[0];
            read[2] = bytes[1];
            Ok(())
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    struct MockCs {
        high: bool,
    }

    impl OutputPin for MockCs {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_pressure_formula() {
        assert_eq!(pressure(400, 2000), 2495);
        assert_eq!(pressure(0, 4095), 0);
    }

    #[test]
    fn test_reads_averaged_position() {
        let mut touch = Xpt2046::new(
            MockSpi::touching(1234, 2345),
            MockCs { high: false },
            Xpt2046Config::default(),
        );

        let sample = touch.read_raw().unwrap().unwrap();
        assert_eq!(sample.x, 1234);
        assert_eq!(sample.y, 2345);
        assert_eq!(sample.z, 2495);

        // CS released after every transfer
        assert!(touch.cs.is_set_high());
        // Two pressure reads around four X/Y pairs
        assert_eq!(touch.spi.transfers, 2 + 8 + 2);
    }

    #[test]
    fn test_no_touch_below_threshold() {
        let mut touch = Xpt2046::new(MockSpi::idle(), MockCs { high: true }, Xpt2046Config::default());
        assert_eq!(touch.read_raw().unwrap(), None);
        // Position never sampled
        assert_eq!(touch.spi.transfers, 2);
    }

    #[test]
    fn test_zero_samples_treated_as_one() {
        let config = Xpt2046Config {
            pressure_threshold: 100,
            samples: 0,
        };
        let mut touch = Xpt2046::new(MockSpi::touching(10, 20), MockCs { high: true }, config);
        let sample = touch.read_raw().unwrap().unwrap();
        assert_eq!((sample.x, sample.y), (10, 20));
    }

    #[test]
    fn test_config_from_hardware() {
        let hw = TouchHwConfig {
            pressure_threshold: 900,
            samples: 8,
            ..Default::default()
        };
        let config = Xpt2046Config::from(&hw);
        assert_eq!(config.pressure_threshold, 900);
        assert_eq!(config.samples, 8);
    }
}
