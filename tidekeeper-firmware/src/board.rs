//! Board wiring
//!
//! Concrete driver types for the Pico carrier board and the construction
//! of the fluid station from the device config.
//!
//! Fixed wiring:
//! - ILI9341 on SPI0: CLK GPIO18, MOSI GPIO19, MISO GPIO16, CS GPIO17,
//!   DC GPIO20, RST GPIO21, backlight GPIO22
//! - XPT2046 on SPI1: CLK GPIO10, MOSI GPIO11, MISO GPIO12, CS GPIO9

use embassy_rp::peripherals::{SPI0, SPI1};
use embassy_rp::spi::{Blocking, Spi};
use heapless::Vec;

use tidekeeper_core::config::{PinConfig, PumpsConfig, SensorsConfig, PANEL_PINS};
use tidekeeper_core::traits::FluidStation;
use tidekeeper_drivers::display::{GraphicsDisplay, Ili9341};
use tidekeeper_drivers::pump::GpioPump;
use tidekeeper_drivers::sensor::FloatSwitch;
use tidekeeper_drivers::touch::Xpt2046;
use tidekeeper_hal_rp2040::gpio::{RpInput, RpOutput};
use tidekeeper_hal_rp2040::pins::{PinBank, PinError};

pub const LCD_CS_PIN: u8 = 17;
pub const LCD_DC_PIN: u8 = 20;
pub const LCD_RST_PIN: u8 = 21;
pub const LCD_BACKLIGHT_PIN: u8 = 22;
pub const TOUCH_CS_PIN: u8 = 9;

pub type Lcd = Ili9341<Spi<'static, SPI0, Blocking>, RpOutput, RpOutput, RpOutput>;
pub type Display = GraphicsDisplay<Lcd>;
pub type Touch = Xpt2046<Spi<'static, SPI1, Blocking>, RpOutput>;
pub type Station =
    FluidStation<GpioPump<RpOutput>, GpioPump<RpOutput>, FloatSwitch<RpInput>, FloatSwitch<RpInput>>;

/// Take a pump output, driven to its "off" level from the start
fn pump_pin(bank: &mut PinBank, pin: &PinConfig) -> Result<GpioPump<RpOutput>, PinError> {
    if PANEL_PINS.contains(&pin.pin) {
        return Err(PinError::Reserved);
    }
    // Off = low, or high when active-low
    let output = bank.output(pin.pin, pin.inverted)?;
    Ok(GpioPump::from_config(output, pin))
}

fn float_pin(bank: &mut PinBank, pin: &PinConfig) -> Result<FloatSwitch<RpInput>, PinError> {
    let input = bank.input(pin.pin, pin.pull_up)?;
    Ok(FloatSwitch::from_config(input, pin))
}

/// Station pins could not be claimed
pub struct StationError {
    pub error: PinError,
    /// Pumps that could still be taken, held at their "off" level.
    /// Dropping them returns the pads to reset state, which switches an
    /// active-low relay on.
    pub parked: Vec<GpioPump<RpOutput>, 2>,
}

impl StationError {
    fn new(bank: &mut PinBank, pumps: &PumpsConfig, error: PinError) -> Self {
        let parked = [pump_pin(bank, &pumps.drain), pump_pin(bank, &pumps.fill)]
            .into_iter()
            .flatten()
            .collect();
        Self { error, parked }
    }
}

/// Claim the pump and float pins and build the station with both pumps off
///
/// All four pins are checked before any is taken.
pub fn fluid_station(
    bank: &mut PinBank,
    pumps: &PumpsConfig,
    sensors: &SensorsConfig,
) -> Result<Station, StationError> {
    let pins = [
        pumps.drain.pin,
        pumps.fill.pin,
        sensors.bottom.pin,
        sensors.top.pin,
    ];
    let checked = if pins.iter().any(|pin| PANEL_PINS.contains(pin)) {
        Err(PinError::Reserved)
    } else {
        bank.check_all(&pins)
    };
    if let Err(error) = checked {
        return Err(StationError::new(bank, pumps, error));
    }

    let drain = pump_pin(bank, &pumps.drain);
    let fill = pump_pin(bank, &pumps.fill);
    let bottom = float_pin(bank, &sensors.bottom);
    let top = float_pin(bank, &sensors.top);
    match (drain, fill, bottom, top) {
        (Ok(drain), Ok(fill), Ok(bottom), Ok(top)) => {
            Ok(FluidStation::new(drain, fill, bottom, top))
        }
        (drain, fill, bottom, top) => {
            let error = [
                drain.as_ref().err(),
                fill.as_ref().err(),
                bottom.as_ref().err(),
                top.as_ref().err(),
            ]
            .into_iter()
            .flatten()
            .next()
            .copied()
            .unwrap_or(PinError::AlreadyTaken);
            let parked = [drain, fill].into_iter().flatten().collect();
            Err(StationError { error, parked })
        }
    }
}

/// Control lines for the panel and the touch controller
pub struct PanelPins {
    pub lcd_cs: RpOutput,
    pub lcd_dc: RpOutput,
    pub lcd_rst: RpOutput,
    pub backlight: RpOutput,
    pub touch_cs: RpOutput,
}

/// Claim the fixed panel pins; chip selects idle high, backlight on
pub fn panel_pins(bank: &mut PinBank) -> Result<PanelPins, PinError> {
    Ok(PanelPins {
        lcd_cs: bank.output(LCD_CS_PIN, true)?,
        lcd_dc: bank.output(LCD_DC_PIN, true)?,
        lcd_rst: bank.output(LCD_RST_PIN, true)?,
        backlight: bank.output(LCD_BACKLIGHT_PIN, true)?,
        touch_cs: bank.output(TOUCH_CS_PIN, true)?,
    })
}
