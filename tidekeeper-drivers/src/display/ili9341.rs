//! ILI9341 TFT controller driver
//!
//! 240x320 RGB565 panel over 4-wire SPI with a separate data/command line.
//! Implements embedded-graphics `DrawTarget` so text and shapes can be
//! rendered with the usual primitives.
//!
//! # Protocol
//!
//! Each command is a single byte sent with DC low, followed by its
//! parameters with DC high. Pixels are written by setting a column/page
//! window (CASET/PASET) and streaming big-endian RGB565 words after RAMWR.

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{ContainsPoint, Rectangle};
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiBus;
use tidekeeper_hal::OutputPin;

/// Command opcodes
pub mod reg {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const PASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const PIXFMT: u8 = 0x3A;
}

/// MADCTL: column order mirrored, BGR subpixels (portrait, connector at bottom)
const MADCTL_PORTRAIT: u8 = 0x48;
/// PIXFMT: 16 bits per pixel
const PIXFMT_16BIT: u8 = 0x55;

/// Pixels buffered per SPI write during fills
const FILL_CHUNK: usize = 32;

/// ILI9341 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ili9341Error {
    /// SPI transfer failed
    Spi,
}

/// ILI9341 on a dedicated SPI bus
pub struct Ili9341<SPI, CS, DC, RST> {
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: RST,
    size: Size,
}

impl<SPI, CS, DC, RST> Ili9341<SPI, CS, DC, RST>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Create the driver; call [`init`](Self::init) before drawing
    pub fn new(spi: SPI, mut cs: CS, dc: DC, mut rst: RST, width: u16, height: u16) -> Self {
        cs.set_high();
        rst.set_high();
        Self {
            spi,
            cs,
            dc,
            rst,
            size: Size::new(u32::from(width), u32::from(height)),
        }
    }

    /// Hardware reset and power-up sequence
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Ili9341Error> {
        self.rst.set_low();
        delay.delay_ms(10);
        self.rst.set_high();
        delay.delay_ms(120);

        self.command(reg::SWRESET, &[])?;
        delay.delay_ms(150);
        self.command(reg::SLPOUT, &[])?;
        delay.delay_ms(120);

        self.command(reg::PIXFMT, &[PIXFMT_16BIT])?;
        self.command(reg::MADCTL, &[MADCTL_PORTRAIT])?;
        self.command(reg::DISPON, &[])?;
        delay.delay_ms(20);
        Ok(())
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, CS, DC, RST) {
        (self.spi, self.cs, self.dc, self.rst)
    }

    fn command(&mut self, cmd: u8, params: &[u8]) -> Result<(), Ili9341Error> {
        self.cs.set_low();
        let result = self.command_selected(cmd, params);
        self.cs.set_high();
        result
    }

    fn command_selected(&mut self, cmd: u8, params: &[u8]) -> Result<(), Ili9341Error> {
        self.dc.set_low();
        self.spi.write(&[cmd]).map_err(|_| Ili9341Error::Spi)?;
        if !params.is_empty() {
            self.dc.set_high();
            self.spi.write(params).map_err(|_| Ili9341Error::Spi)?;
        }
        self.spi.flush().map_err(|_| Ili9341Error::Spi)
    }

    /// Set the drawing window (inclusive bounds) and open RAM for writing
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Ili9341Error> {
        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.command_selected(reg::CASET, &[x0h, x0l, x1h, x1l])?;
        self.command_selected(reg::PASET, &[y0h, y0l, y1h, y1l])?;
        self.command_selected(reg::RAMWR, &[])?;
        self.dc.set_high();
        Ok(())
    }

    /// Fill a clipped, non-empty window with one colour
    fn fill_window(&mut self, area: &Rectangle, color: Rgb565) -> Result<(), Ili9341Error> {
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        self.cs.set_low();
        let result = self
            .set_window(
                area.top_left.x as u16,
                area.top_left.y as u16,
                bottom_right.x as u16,
                bottom_right.y as u16,
            )
            .and_then(|_| {
                let [hi, lo] = color.into_storage().to_be_bytes();
                let mut chunk = [0u8; FILL_CHUNK * 2];
                for px in chunk.chunks_exact_mut(2) {
                    px[0] = hi;
                    px[1] = lo;
                }

                let mut remaining = area.size.width as usize * area.size.height as usize;
                while remaining > 0 {
                    let n = remaining.min(FILL_CHUNK);
                    self.spi.write(&chunk[..n * 2]).map_err(|_| Ili9341Error::Spi)?;
                    remaining -= n;
                }
                self.spi.flush().map_err(|_| Ili9341Error::Spi)
            });
        self.cs.set_high();
        result
    }
}

impl<SPI, CS, DC, RST> OriginDimensions for Ili9341<SPI, CS, DC, RST> {
    fn size(&self) -> Size {
        self.size
    }
}

impl<SPI, CS, DC, RST> DrawTarget for Ili9341<SPI, CS, DC, RST>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    type Color = Rgb565;
    type Error = Ili9341Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if bounds.contains(point) {
                self.fill_window(&Rectangle::new(point, Size::new(1, 1)), color)?;
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let clipped = area.intersection(&self.bounding_box());
        if clipped.size.width == 0 || clipped.size.height == 0 {
            return Ok(());
        }
        self.fill_window(&clipped, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let bounds = self.bounding_box();
        self.fill_window(&bounds, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::spi::ErrorType;
    use heapless::Vec;

    /// Records command bytes (sent with DC low) and counts data bytes
    struct MockSpi<'a> {
        dc: &'a core::cell::Cell<bool>,
        commands: Vec<u8, 64>,
        params: Vec<u8, 64>,
        data_bytes: usize,
    }

    impl ErrorType for MockSpi<'_> {
        type Error = Infallible;
    }

    impl SpiBus<u8> for MockSpi<'_> {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            if self.dc.get() {
                self.data_bytes += words.len();
                for &b in words {
                    let _ = self.params.push(b);
                }
            } else {
                for &b in words {
                    let _ = self.commands.push(b);
                }
            }
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Infallible> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    /// Output pin mirroring its level into a shared cell
    struct SharedPin<'a>(&'a core::cell::Cell<bool>);

    impl OutputPin for SharedPin<'_> {
        fn set_high(&mut self) {
            self.0.set(true);
        }

        fn set_low(&mut self) {
            self.0.set(false);
        }

        fn is_set_high(&self) -> bool {
            self.0.get()
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn panel<'a>(
        dc: &'a core::cell::Cell<bool>,
        cs: &'a core::cell::Cell<bool>,
        rst: &'a core::cell::Cell<bool>,
    ) -> Ili9341<MockSpi<'a>, SharedPin<'a>, SharedPin<'a>, SharedPin<'a>> {
        let spi = MockSpi {
            dc,
            commands: Vec::new(),
            params: Vec::new(),
            data_bytes: 0,
        };
        Ili9341::new(spi, SharedPin(cs), SharedPin(dc), SharedPin(rst), 240, 320)
    }

    #[test]
    fn test_init_sequence() {
        let (dc, cs, rst) = Default::default();
        let mut lcd = panel(&dc, &cs, &rst);
        lcd.init(&mut NoDelay).unwrap();

        assert_eq!(
            lcd.spi.commands.as_slice(),
            &[
                reg::SWRESET,
                reg::SLPOUT,
                reg::PIXFMT,
                reg::MADCTL,
                reg::DISPON
            ]
        );
        assert_eq!(lcd.spi.params.as_slice(), &[PIXFMT_16BIT, MADCTL_PORTRAIT]);
        assert!(cs.get());
        assert!(rst.get());
    }

    #[test]
    fn test_fill_solid_clips_to_panel() {
        let (dc, cs, rst) = Default::default();
        let mut lcd = panel(&dc, &cs, &rst);

        // Hangs 10px off the right edge
        lcd.fill_solid(
            &Rectangle::new(Point::new(230, 0), Size::new(20, 2)),
            Rgb565::RED,
        )
        .unwrap();

        assert_eq!(
            lcd.spi.commands.as_slice(),
            &[reg::CASET, reg::PASET, reg::RAMWR]
        );
        // Window 230..=239 x 0..=1
        assert_eq!(&lcd.spi.params[..8], &[0, 230, 0, 239, 0, 0, 0, 1]);
        // 8 window bytes + 10x2 pixels at 2 bytes each
        assert_eq!(lcd.spi.data_bytes, 8 + 40);
        assert!(cs.get());
    }

    #[test]
    fn test_fill_outside_panel_is_noop() {
        let (dc, cs, rst) = Default::default();
        let mut lcd = panel(&dc, &cs, &rst);
        lcd.fill_solid(
            &Rectangle::new(Point::new(300, 400), Size::new(5, 5)),
            Rgb565::RED,
        )
        .unwrap();
        assert!(lcd.spi.commands.is_empty());
    }

    #[test]
    fn test_draw_iter_skips_offscreen_pixels() {
        let (dc, cs, rst) = Default::default();
        let mut lcd = panel(&dc, &cs, &rst);
        lcd.draw_iter([
            Pixel(Point::new(1, 1), Rgb565::WHITE),
            Pixel(Point::new(-1, 1), Rgb565::WHITE),
        ])
        .unwrap();
        assert_eq!(lcd.spi.commands.len(), 3);
        assert_eq!(lcd.size(), Size::new(240, 320));
    }
}
