//! embedded-graphics adapter for the controller's display trait
//!
//! Wraps any RGB565 `DrawTarget` and renders the controller palette,
//! scaled text, rounded buttons and calibration crosshairs on it.
//!
//! Text uses the 6x9 mono font; `TextStyle::size` scales each glyph pixel
//! to a `size x size` block, so size 2 gives a 12x18 cell.

use embedded_graphics::mono_font::ascii::FONT_6X9;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle,
};
use embedded_graphics::text::{Baseline, Text};
use tidekeeper_core::geometry;
use tidekeeper_core::traits::display::{ButtonStyle, TextStyle};
use tidekeeper_core::traits::{Color, DisplayDriver, DisplayError};

/// Glyph cell of the base font
const CHAR_W: u32 = 6;
const CHAR_H: u32 = 9;

/// Map the controller palette onto RGB565
pub fn rgb565(color: Color) -> Rgb565 {
    match color {
        Color::Black => Rgb565::BLACK,
        Color::White => Rgb565::WHITE,
        Color::Red => Rgb565::RED,
        Color::Cyan => Rgb565::CYAN,
        Color::Magenta => Rgb565::MAGENTA,
        Color::DarkGrey => Rgb565::new(15, 31, 15),
        Color::DarkGreen => Rgb565::new(0, 31, 0),
        Color::GreenYellow => Rgb565::new(22, 63, 0),
    }
}

fn rectangle(area: geometry::Rect) -> Rectangle {
    Rectangle::new(Point::new(area.x, area.y), Size::new(area.w, area.h))
}

/// Display driver backed by an embedded-graphics target
pub struct GraphicsDisplay<T> {
    target: T,
}

impl<T> GraphicsDisplay<T>
where
    T: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    pub fn new(target: T) -> Self {
        Self { target }
    }

    pub fn inner(&self) -> &T {
        &self.target
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn release(self) -> T {
        self.target
    }
}

impl<T> DisplayDriver for GraphicsDisplay<T>
where
    T: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    fn size(&self) -> (u32, u32) {
        let size = self.target.size();
        (size.width, size.height)
    }

    fn clear(&mut self, color: Color) -> Result<(), DisplayError> {
        self.target
            .clear(rgb565(color))
            .map_err(|_| DisplayError::Bus)
    }

    fn fill_rect(&mut self, area: geometry::Rect, color: Color) -> Result<(), DisplayError> {
        self.target
            .fill_solid(&rectangle(area), rgb565(color))
            .map_err(|_| DisplayError::Bus)
    }

    fn draw_text(
        &mut self,
        pos: geometry::Point,
        text: &str,
        style: TextStyle,
    ) -> Result<(), DisplayError> {
        let mut builder = MonoTextStyleBuilder::new()
            .font(&FONT_6X9)
            .text_color(rgb565(style.color));
        if let Some(bg) = style.background {
            builder = builder.background_color(rgb565(bg));
        }

        let mut scaled = Scaled {
            target: &mut self.target,
            origin: Point::new(pos.x, pos.y),
            scale: u32::from(style.size.max(1)),
        };
        Text::with_baseline(text, Point::zero(), builder.build(), Baseline::Top)
            .draw(&mut scaled)
            .map(|_| ())
            .map_err(|_| DisplayError::Bus)
    }

    fn draw_button(
        &mut self,
        area: geometry::Rect,
        style: &ButtonStyle,
        pressed: bool,
    ) -> Result<(), DisplayError> {
        let (fill, text) = if pressed {
            (style.text, style.fill)
        } else {
            (style.fill, style.text)
        };

        let radius = area.w.min(area.h) / 4;
        let body = PrimitiveStyleBuilder::new()
            .fill_color(rgb565(fill))
            .stroke_color(rgb565(style.outline))
            .stroke_width(1)
            .build();
        RoundedRectangle::with_equal_corners(rectangle(area), Size::new_equal(radius))
            .into_styled(body)
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Bus)?;

        // Label centred in the button
        let scale = u32::from(style.text_size.max(1));
        let label_w = style.label.len() as u32 * CHAR_W * scale;
        let label_h = CHAR_H * scale;
        let center = area.center();
        let pos = geometry::Point::new(
            center.x - (label_w / 2) as i32,
            center.y - (label_h / 2) as i32,
        );
        self.draw_text(
            pos,
            style.label,
            TextStyle {
                size: style.text_size,
                color: text,
                background: None,
            },
        )
    }

    fn draw_marker(
        &mut self,
        center: geometry::Point,
        size: u32,
        color: Color,
    ) -> Result<(), DisplayError> {
        let c = Point::new(center.x, center.y);
        let half = (size / 2) as i32;
        let stroke = PrimitiveStyle::with_stroke(rgb565(color), 1);

        Line::new(c - Point::new(half, 0), c + Point::new(half, 0))
            .into_styled(stroke)
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Bus)?;
        Line::new(c - Point::new(0, half), c + Point::new(0, half))
            .into_styled(stroke)
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Bus)
    }
}

/// Draw target that blows every pixel up into a square block
struct Scaled<'a, T> {
    target: &'a mut T,
    origin: Point,
    scale: u32,
}

impl<T: OriginDimensions> Dimensions for Scaled<'_, T> {
    /// Target area in unscaled coordinates, relative to `origin`
    fn bounding_box(&self) -> Rectangle {
        let size = self.target.size();
        Rectangle::new(
            Point::zero() - self.origin / self.scale as i32,
            Size::new(size.width / self.scale, size.height / self.scale),
        )
    }
}

impl<T> DrawTarget for Scaled<'_, T>
where
    T: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    type Color = Rgb565;
    type Error = T::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let s = self.scale as i32;
        for Pixel(p, color) in pixels {
            let block = Rectangle::new(
                self.origin + Point::new(p.x * s, p.y * s),
                Size::new_equal(self.scale),
            );
            self.target.fill_solid(&block, color)?;
        }
        Ok(())
    }
}
