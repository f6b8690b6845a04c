//! Display driver trait for the TFT touch panel

use core::fmt::Write;

use heapless::String;

use crate::geometry::{Point, Rect};

/// Errors that can occur while drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// SPI transfer failed
    Bus,
    /// Control pin (DC/CS/RST) could not be driven
    Pin,
    /// Text did not fit the formatting buffer
    Format,
}

/// Panel palette
///
/// Named after the colours the screens use. Drivers map these onto their
/// native pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Black,
    White,
    Red,
    Cyan,
    DarkGrey,
    DarkGreen,
    GreenYellow,
    Magenta,
}

/// Text rendering parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextStyle {
    /// Glyph scale (1 = 6x8 cell)
    pub size: u8,
    /// Foreground colour
    pub color: Color,
    /// Background fill behind glyphs, `None` for transparent
    pub background: Option<Color>,
}

impl TextStyle {
    /// White on black, the style used for nearly all labels
    pub const fn plain(size: u8) -> Self {
        Self {
            size,
            color: Color::White,
            background: Some(Color::Black),
        }
    }

    pub const fn colored(size: u8, color: Color) -> Self {
        Self {
            size,
            color,
            background: Some(Color::Black),
        }
    }
}

/// Visual style of an on-screen button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonStyle {
    pub outline: Color,
    pub fill: Color,
    pub text: Color,
    pub label: &'static str,
    pub text_size: u8,
}

/// Trait for the drawing surface
///
/// Drawing is synchronous: every call completes before the next UI step.
pub trait DisplayDriver {
    /// Panel size in pixels (width, height)
    fn size(&self) -> (u32, u32);

    /// Fill the whole screen
    fn clear(&mut self, color: Color) -> Result<(), DisplayError>;

    /// Fill a rectangular region
    fn fill_rect(&mut self, area: Rect, color: Color) -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at `pos`
    fn draw_text(&mut self, pos: Point, text: &str, style: TextStyle) -> Result<(), DisplayError>;

    /// Draw a button
    ///
    /// `pressed` swaps the fill and text colours.
    fn draw_button(
        &mut self,
        area: Rect,
        style: &ButtonStyle,
        pressed: bool,
    ) -> Result<(), DisplayError>;

    /// Draw a calibration crosshair of `size` pixels centred on `center`
    fn draw_marker(&mut self, center: Point, size: u32, color: Color) -> Result<(), DisplayError>;
}

/// Helper trait for drawing formatted values
pub trait DisplayExt: DisplayDriver {
    /// Draw a number zero-padded to two digits
    fn draw_two_digits(
        &mut self,
        pos: Point,
        value: u16,
        style: TextStyle,
    ) -> Result<(), DisplayError> {
        let mut buf: String<6> = String::new();
        write!(buf, "{:02}", value).map_err(|_| DisplayError::Format)?;
        self.draw_text(pos, &buf, style)
    }
}

// Blanket implementation for all DisplayDriver types
impl<T: DisplayDriver> DisplayExt for T {}
