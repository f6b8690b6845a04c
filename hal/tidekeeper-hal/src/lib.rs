//! Tidekeeper Hardware Abstraction Layer
//!
//! Hardware abstraction traits implemented by chip-specific HALs. The
//! application crates only ever see these traits, so the controller logic
//! runs unchanged on the target and on the host under test.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  Application (tidekeeper-firmware)       │
//! └──────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌──────────────────────────────────────────┐
//! │  tidekeeper-hal (this crate - traits)    │
//! └──────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ tidekeeper-hal-   │
//!           │     rp2040        │
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O for pumps and float switches
//! - [`flash::FlashStorage`] - Persistent key/value storage

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, FlashStorage, StorageKey};
pub use gpio::{InputPin, OutputPin};
