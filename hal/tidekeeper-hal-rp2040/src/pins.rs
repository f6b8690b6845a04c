//! Config-driven pin assignment
//!
//! Pump and float-switch pins come from the device config, so they are
//! handed out by number at runtime. The SPI bus pins for the panel and the
//! touch controller are fixed by the board and never enter the bank.

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::{
    DMA_CH0, FLASH, PIN_10, PIN_11, PIN_12, PIN_16, PIN_18, PIN_19, SPI0, SPI1,
};
use embassy_rp::{Peri, Peripherals};

use crate::gpio::{RpInput, RpOutput};

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// Pins owned by the SPI buses
pub const BUS_PINS: [u8; 6] = [10, 11, 12, 16, 18, 19];

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin belongs to an SPI bus or the panel
    Reserved,
}

/// Bus peripherals and the fixed pins that go with them
pub struct BoardPeripherals {
    pub flash: Peri<'static, FLASH>,
    pub dma_ch0: Peri<'static, DMA_CH0>,
    /// Display bus
    pub spi0: Peri<'static, SPI0>,
    pub spi0_clk: Peri<'static, PIN_18>,
    pub spi0_mosi: Peri<'static, PIN_19>,
    pub spi0_miso: Peri<'static, PIN_16>,
    /// Touch bus
    pub spi1: Peri<'static, SPI1>,
    pub spi1_clk: Peri<'static, PIN_10>,
    pub spi1_mosi: Peri<'static, PIN_11>,
    pub spi1_miso: Peri<'static, PIN_12>,
}

/// Bank of GPIOs that can be taken by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT as usize],
}

impl PinBank {
    /// Split the peripherals into the pin bank and the fixed bus peripherals
    pub fn from_peripherals(p: Peripherals) -> (Self, BoardPeripherals) {
        let bank = Self {
            pins: [
                Some(p.PIN_0.into()),
                Some(p.PIN_1.into()),
                Some(p.PIN_2.into()),
                Some(p.PIN_3.into()),
                Some(p.PIN_4.into()),
                Some(p.PIN_5.into()),
                Some(p.PIN_6.into()),
                Some(p.PIN_7.into()),
                Some(p.PIN_8.into()),
                Some(p.PIN_9.into()),
                None,
                None,
                None,
                Some(p.PIN_13.into()),
                Some(p.PIN_14.into()),
                Some(p.PIN_15.into()),
                None,
                Some(p.PIN_17.into()),
                None,
                None,
                Some(p.PIN_20.into()),
                Some(p.PIN_21.into()),
                Some(p.PIN_22.into()),
                Some(p.PIN_23.into()),
                Some(p.PIN_24.into()),
                Some(p.PIN_25.into()),
                Some(p.PIN_26.into()),
                Some(p.PIN_27.into()),
                Some(p.PIN_28.into()),
                Some(p.PIN_29.into()),
            ],
        };
        let board = BoardPeripherals {
            flash: p.FLASH,
            dma_ch0: p.DMA_CH0,
            spi0: p.SPI0,
            spi0_clk: p.PIN_18,
            spi0_mosi: p.PIN_19,
            spi0_miso: p.PIN_16,
            spi1: p.SPI1,
            spi1_clk: p.PIN_10,
            spi1_mosi: p.PIN_11,
            spi1_miso: p.PIN_12,
        };
        (bank, board)
    }

    /// Check that a pin could be taken, without taking it
    pub fn check(&self, pin_num: u8) -> Result<(), PinError> {
        if pin_num >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        if BUS_PINS.contains(&pin_num) {
            return Err(PinError::Reserved);
        }
        if self.pins[pin_num as usize].is_none() {
            return Err(PinError::AlreadyTaken);
        }
        Ok(())
    }

    /// Check a group of pins that will be taken together
    ///
    /// Fails if any pin is unavailable or appears twice.
    pub fn check_all(&self, pins: &[u8]) -> Result<(), PinError> {
        for (i, &pin) in pins.iter().enumerate() {
            self.check(pin)?;
            if pins[..i].contains(&pin) {
                return Err(PinError::AlreadyTaken);
            }
        }
        Ok(())
    }

    /// Take a pin by number
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        self.check(pin_num)?;
        self.pins[pin_num as usize]
            .take()
            .ok_or(PinError::AlreadyTaken)
    }

    /// Check if a pin is available
    pub fn is_available(&self, pin_num: u8) -> bool {
        pin_num < GPIO_COUNT && self.pins[pin_num as usize].is_some()
    }

    /// Take a pin as an output driven to `initial_high`
    pub fn output(&mut self, pin_num: u8, initial_high: bool) -> Result<RpOutput, PinError> {
        Ok(RpOutput::new(self.take(pin_num)?, initial_high))
    }

    /// Take a pin as an input
    pub fn input(&mut self, pin_num: u8, pull_up: bool) -> Result<RpInput, PinError> {
        Ok(RpInput::new(self.take(pin_num)?, pull_up))
    }
}
