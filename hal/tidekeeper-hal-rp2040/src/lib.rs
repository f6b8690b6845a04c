//! RP2040-specific HAL for the aquarium controller firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `tidekeeper-hal` traits:
//!
//! - GPIO wrappers for pumps and float switches
//! - Pin bank for config-driven pin assignment
//! - Flash storage driver (implements `tidekeeper_hal::FlashStorage`)

#![no_std]

pub mod flash;
pub mod gpio;
pub mod pins;

// Re-export shared traits from tidekeeper-hal for convenience
pub use tidekeeper_hal::{FlashStorage as FlashStorageTrait, StorageKey};
