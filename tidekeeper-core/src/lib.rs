//! Board-agnostic core logic for the aquarium controller firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (pumps, float switches, display, touch)
//! - Schedule model (change interval in days/hours)
//! - Water-change sequencer (drain, settle, refill)
//! - UI mode controller (Normal/Edit, button edges, auto-repeat)
//! - Touch calibration model
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod calibration;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod schedule;
pub mod sequencer;
pub mod traits;
pub mod ui;

#[cfg(test)]
mod testing;

pub use controller::{Controller, TickReport};
