//! Configuration loading and parsing
//!
//! Loads the device configuration from flash or embedded defaults, and the
//! touch calibration that goes with the panel.

pub mod calibration;
pub mod loader;

pub use calibration::calibrate_touch;
pub use loader::ConfigPersistence;
pub use tidekeeper_core::config::parse_config;
