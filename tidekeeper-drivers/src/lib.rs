//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in tidekeeper-core:
//!
//! - Pumps on a GPIO-driven relay or MOSFET
//! - Float switches on a GPIO input
//! - XPT2046 resistive touch controller (SPI)
//! - ILI9341 TFT panel (SPI) and an embedded-graphics display adapter

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod pump;
pub mod sensor;
pub mod touch;
