//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod display;
pub mod fluid;
pub mod touch;

pub use display::{Color, DisplayDriver, DisplayError};
pub use fluid::{FluidIo, FluidStation, LevelSensor, Pump, PumpCommand};
pub use touch::{RawTouch, TouchError, TouchPanel};
