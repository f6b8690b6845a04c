//! Interactive four-corner calibration
//!
//! The operator touches a marker near each corner in turn. The averaged
//! edge readings are extrapolated out to the panel edges, and axis swap and
//! inversion are detected from how the raw channels move between markers.

use crate::geometry::Point;
use crate::traits::RawTouch;

use super::blob::{BlobError, TouchCalibration, FLAG_INVERT_X, FLAG_INVERT_Y, FLAG_SWAP_XY};

/// Marker distance from the panel edges (px)
pub const MARKER_INSET: u16 = 15;

/// Largest raw reading of the 12-bit touch ADC
const RAW_MAX: i32 = 4095;

/// Marker positions, in the order they are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];
}

/// Progress of the corner procedure
#[derive(Debug, Clone)]
pub struct CornerCalibration {
    width: u16,
    height: u16,
    samples: [Option<RawTouch>; 4],
    next: usize,
}

impl CornerCalibration {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            samples: [None; 4],
            next: 0,
        }
    }

    /// Corner awaiting a touch
    pub fn current(&self) -> Option<Corner> {
        Corner::ALL.get(self.next).copied()
    }

    /// Marker centre for the corner awaiting a touch
    pub fn target(&self) -> Option<Point> {
        self.current().map(|corner| self.marker(corner))
    }

    /// Marker centre for `corner`
    pub fn marker(&self, corner: Corner) -> Point {
        let left = MARKER_INSET as i32;
        let top = MARKER_INSET as i32;
        let right = self.width as i32 - 1 - MARKER_INSET as i32;
        let bottom = self.height as i32 - 1 - MARKER_INSET as i32;
        match corner {
            Corner::TopLeft => Point::new(left, top),
            Corner::TopRight => Point::new(right, top),
            Corner::BottomLeft => Point::new(left, bottom),
            Corner::BottomRight => Point::new(right, bottom),
        }
    }

    /// Record the touch for the current corner
    ///
    /// Returns `true` once all four corners have a sample.
    pub fn record(&mut self, raw: RawTouch) -> bool {
        if let Some(slot) = self.samples.get_mut(self.next) {
            *slot = Some(raw);
            self.next += 1;
        }
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.next >= self.samples.len()
    }

    /// Compute the calibration from the four samples
    pub fn finish(&self) -> Result<TouchCalibration, BlobError> {
        let [Some(tl), Some(tr), Some(bl), Some(br)] = self.samples else {
            return Err(BlobError::Invalid);
        };

        let avg = |a: u16, b: u16| (a as i32 + b as i32) / 2;

        // How much raw X moves across the screen vs. down it
        let x_across = (avg(tr.x, br.x) - avg(tl.x, bl.x)).abs();
        let x_down = (avg(bl.x, br.x) - avg(tl.x, tr.x)).abs();
        let swap = x_down > x_across;

        let horizontal = |s: RawTouch| if swap { s.y } else { s.x };
        let vertical = |s: RawTouch| if swap { s.x } else { s.y };

        let left = avg(horizontal(tl), horizontal(bl));
        let right = avg(horizontal(tr), horizontal(br));
        let top = avg(vertical(tl), vertical(tr));
        let bottom = avg(vertical(bl), vertical(br));

        let (x_min, x_max) = extrapolate(left, right, self.width)?;
        let (y_min, y_max) = extrapolate(top, bottom, self.height)?;

        let mut flags = 0;
        if swap {
            flags |= FLAG_SWAP_XY;
        }
        if left > right {
            flags |= FLAG_INVERT_X;
        }
        if top > bottom {
            flags |= FLAG_INVERT_Y;
        }

        let cal = TouchCalibration {
            x_min,
            x_max,
            y_min,
            y_max,
            flags,
            width: self.width,
            height: self.height,
        };
        if cal.is_valid() {
            Ok(cal)
        } else {
            Err(BlobError::Invalid)
        }
    }
}

/// Extend marker readings out to pixel 0 and pixel `size - 1`
///
/// Returns the raw range in ascending order.
fn extrapolate(near: i32, far: i32, size: u16) -> Result<(u16, u16), BlobError> {
    let span_px = size as i32 - 1 - 2 * MARKER_INSET as i32;
    if span_px <= 0 || near == far {
        return Err(BlobError::Invalid);
    }

    let overshoot = (far - near) * MARKER_INSET as i32 / span_px;
    let at_start = (near - overshoot).clamp(0, RAW_MAX);
    let at_end = (far + overshoot).clamp(0, RAW_MAX);

    let (lo, hi) = if at_start <= at_end {
        (at_start, at_end)
    } else {
        (at_end, at_start)
    };
    Ok((lo as u16, hi as u16))
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: u16 = 240;
    const H: u16 = 320;

    /// Linear panel model: raw = offset + px * gain, per axis
    fn raw_at(p: Point, swap: bool, invert_x: bool) -> RawTouch {
        let sx = if invert_x { (W as i32 - 1) - p.x } else { p.x };
        let a = (200 + sx * 15) as u16;
        let b = (300 + p.y * 11) as u16;
        if swap {
            RawTouch { x: b, y: a, z: 800 }
        } else {
            RawTouch { x: a, y: b, z: 800 }
        }
    }

    fn run(swap: bool, invert_x: bool) -> TouchCalibration {
        let mut session = CornerCalibration::new(W, H);
        while let Some(target) = session.target() {
            session.record(raw_at(target, swap, invert_x));
        }
        assert!(session.is_complete());
        session.finish().unwrap()
    }

    fn assert_close(a: Point, b: Point) {
        assert!((a.x - b.x).abs() <= 1, "{:?} vs {:?}", a, b);
        assert!((a.y - b.y).abs() <= 1, "{:?} vs {:?}", a, b);
    }

    #[test]
    fn test_marker_order() {
        let mut session = CornerCalibration::new(W, H);
        assert_eq!(session.current(), Some(Corner::TopLeft));
        assert_eq!(session.target(), Some(Point::new(15, 15)));
        session.record(RawTouch { x: 0, y: 0, z: 0 });
        assert_eq!(session.target(), Some(Point::new(224, 15)));
        session.record(RawTouch { x: 0, y: 0, z: 0 });
        assert_eq!(session.target(), Some(Point::new(15, 304)));
        session.record(RawTouch { x: 0, y: 0, z: 0 });
        assert_eq!(session.current(), Some(Corner::BottomRight));
        assert!(session.record(RawTouch { x: 0, y: 0, z: 0 }));
        assert_eq!(session.target(), None);
    }

    #[test]
    fn test_plain_orientation() {
        let cal = run(false, false);
        assert_eq!(cal.flags, 0);
        for p in [Point::new(120, 160), Point::new(5, 300), Point::new(230, 10)] {
            assert_close(cal.map(raw_at(p, false, false)), p);
        }
    }

    #[test]
    fn test_swapped_axes_detected() {
        let cal = run(true, false);
        assert_eq!(cal.flags & FLAG_SWAP_XY, FLAG_SWAP_XY);
        let p = Point::new(60, 250);
        assert_close(cal.map(raw_at(p, true, false)), p);
    }

    #[test]
    fn test_inverted_x_detected() {
        let cal = run(false, true);
        assert_eq!(cal.flags, FLAG_INVERT_X);
        let p = Point::new(200, 40);
        assert_close(cal.map(raw_at(p, false, true)), p);
    }

    #[test]
    fn test_degenerate_touches_rejected() {
        let mut session = CornerCalibration::new(W, H);
        for _ in 0..4 {
            session.record(RawTouch { x: 2000, y: 2000, z: 900 });
        }
        assert_eq!(session.finish(), Err(BlobError::Invalid));
    }

    #[test]
    fn test_incomplete_rejected() {
        let mut session = CornerCalibration::new(W, H);
        session.record(RawTouch { x: 100, y: 100, z: 900 });
        assert_eq!(session.finish(), Err(BlobError::Invalid));
    }
}
