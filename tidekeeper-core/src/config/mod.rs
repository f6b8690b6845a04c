//! Configuration types
//!
//! Board-agnostic configuration structures, loaded from TOML or stored as
//! postcard binary data.

pub mod hardware;
pub mod toml;
pub mod types;

pub use hardware::*;
pub use toml::{parse_config, ParseError};
pub use types::*;
