//! Screen geometry primitives

/// A point in screen coordinates (pixels, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub w: u32,
    /// Height in pixels
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rectangle from its centre point, the way buttons are laid out
    pub const fn from_center(cx: i32, cy: i32, w: u32, h: u32) -> Self {
        Self {
            x: cx - (w / 2) as i32,
            y: cy - (h / 2) as i32,
            w,
            h,
        }
    }

    /// Centre point (rounded towards the top-left)
    pub const fn center(&self) -> Point {
        Point::new(self.x + (self.w / 2) as i32, self.y + (self.h / 2) as i32)
    }

    /// Hit test. Left/top edges are inclusive, right/bottom exclusive.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x
            && p.y >= self.y
            && p.x < self.x + self.w as i32
            && p.y < self.y + self.h as i32
    }
}
