//! Level sensor drivers

pub mod float;

pub use float::FloatSwitch;
