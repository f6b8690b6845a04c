//! Touch panel trait

/// Raw touch controller sample, before calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTouch {
    /// Raw X channel (12-bit ADC counts)
    pub x: u16,
    /// Raw Y channel (12-bit ADC counts)
    pub y: u16,
    /// Contact pressure estimate
    pub z: u16,
}

/// Errors from the touch controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// Bus transfer failed
    Bus,
    /// Chip select could not be driven
    ChipSelect,
}

/// Trait for resistive/capacitive touch controllers
pub trait TouchPanel {
    /// Sample the panel
    ///
    /// Returns `Ok(None)` when nothing is touching the panel.
    fn read_raw(&mut self) -> Result<Option<RawTouch>, TouchError>;
}
