//! Display drivers

pub mod graphics;
pub mod ili9341;

pub use graphics::GraphicsDisplay;
pub use ili9341::{Ili9341, Ili9341Error};
