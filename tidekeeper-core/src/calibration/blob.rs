//! Persisted touch calibration

use crate::geometry::Point;
use crate::traits::RawTouch;

/// Size of the stored calibration record
pub const CALIBRATION_BLOB_LEN: usize = 14;

/// Raw axes are swapped relative to the screen
pub const FLAG_SWAP_XY: u16 = 1 << 0;
/// Screen X grows as raw X shrinks
pub const FLAG_INVERT_X: u16 = 1 << 1;
/// Screen Y grows as raw Y shrinks
pub const FLAG_INVERT_Y: u16 = 1 << 2;

const KNOWN_FLAGS: u16 = FLAG_SWAP_XY | FLAG_INVERT_X | FLAG_INVERT_Y;

/// Calibration record errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlobError {
    /// Stored record is not exactly 14 bytes
    WrongLength,
    /// Ranges are empty or flags unknown
    Invalid,
}

/// Fixed 14-byte calibration record
///
/// Seven little-endian `u16` values:
/// `x_min, x_max, y_min, y_max, flags, width, height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationBlob([u8; CALIBRATION_BLOB_LEN]);

impl CalibrationBlob {
    /// Accept exactly [`CALIBRATION_BLOB_LEN`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlobError> {
        let bytes: [u8; CALIBRATION_BLOB_LEN] =
            bytes.try_into().map_err(|_| BlobError::WrongLength)?;
        Ok(Self(bytes))
    }

    pub fn from_values(values: [u16; 7]) -> Self {
        let mut bytes = [0u8; CALIBRATION_BLOB_LEN];
        for (chunk, value) in bytes.chunks_exact_mut(2).zip(values) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        Self(bytes)
    }

    pub fn values(&self) -> [u16; 7] {
        let mut values = [0u16; 7];
        for (value, chunk) in values.iter_mut().zip(self.0.chunks_exact(2)) {
            *value = u16::from_le_bytes([chunk[0], chunk[1]]);
        }
        values
    }

    pub fn as_bytes(&self) -> &[u8; CALIBRATION_BLOB_LEN] {
        &self.0
    }
}

/// Raw-to-screen mapping for the touch controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchCalibration {
    /// Raw reading at the left/right edges (screen X axis)
    pub x_min: u16,
    pub x_max: u16,
    /// Raw reading at the top/bottom edges (screen Y axis)
    pub y_min: u16,
    pub y_max: u16,
    /// `FLAG_*` bits
    pub flags: u16,
    /// Panel size the calibration was taken on
    pub width: u16,
    pub height: u16,
}

impl TouchCalibration {
    /// Decode and validate a stored record
    pub fn from_blob(blob: &CalibrationBlob) -> Result<Self, BlobError> {
        let [x_min, x_max, y_min, y_max, flags, width, height] = blob.values();
        let cal = Self {
            x_min,
            x_max,
            y_min,
            y_max,
            flags,
            width,
            height,
        };
        if cal.is_valid() {
            Ok(cal)
        } else {
            Err(BlobError::Invalid)
        }
    }

    pub fn to_blob(&self) -> CalibrationBlob {
        CalibrationBlob::from_values([
            self.x_min,
            self.x_max,
            self.y_min,
            self.y_max,
            self.flags,
            self.width,
            self.height,
        ])
    }

    pub fn is_valid(&self) -> bool {
        self.x_min < self.x_max
            && self.y_min < self.y_max
            && self.width > 0
            && self.height > 0
            && self.flags & !KNOWN_FLAGS == 0
    }

    /// Calibration was taken on a panel of this size
    pub fn matches_panel(&self, width: u16, height: u16) -> bool {
        self.width == width && self.height == height
    }

    /// Convert a raw sample to screen coordinates, clamped to the panel
    pub fn map(&self, raw: RawTouch) -> Point {
        let (rx, ry) = if self.flags & FLAG_SWAP_XY != 0 {
            (raw.y, raw.x)
        } else {
            (raw.x, raw.y)
        };

        let x = scale(rx, self.x_min, self.x_max, self.width);
        let y = scale(ry, self.y_min, self.y_max, self.height);

        let x = if self.flags & FLAG_INVERT_X != 0 {
            (self.width as i32 - 1) - x
        } else {
            x
        };
        let y = if self.flags & FLAG_INVERT_Y != 0 {
            (self.height as i32 - 1) - y
        } else {
            y
        };

        Point::new(x, y)
    }
}

/// Map `raw` in `[min, max]` onto `[0, size - 1]`
fn scale(raw: u16, min: u16, max: u16, size: u16) -> i32 {
    let raw = raw.clamp(min, max) as i32;
    let span = (max - min).max(1) as i32;
    (raw - min as i32) * (size as i32 - 1) / span
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cal() -> TouchCalibration {
        TouchCalibration {
            x_min: 200,
            x_max: 3785,
            y_min: 300,
            y_max: 3809,
            flags: 0,
            width: 240,
            height: 320,
        }
    }

    #[test]
    fn test_blob_layout_little_endian() {
        let blob = CalibrationBlob::from_values([0x0102, 2, 3, 4, 5, 240, 320]);
        assert_eq!(blob.as_bytes()[0], 0x02);
        assert_eq!(blob.as_bytes()[1], 0x01);
        assert_eq!(&blob.as_bytes()[10..12], &240u16.to_le_bytes());
        assert_eq!(blob.values(), [0x0102, 2, 3, 4, 5, 240, 320]);
    }

    #[test]
    fn test_blob_length_is_enforced() {
        assert_eq!(
            CalibrationBlob::from_bytes(&[0u8; 13]),
            Err(BlobError::WrongLength)
        );
        assert_eq!(
            CalibrationBlob::from_bytes(&[0u8; 15]),
            Err(BlobError::WrongLength)
        );
        assert!(CalibrationBlob::from_bytes(&[0u8; 14]).is_ok());
    }

    #[test]
    fn test_from_blob_validates() {
        let good = cal().to_blob();
        assert_eq!(TouchCalibration::from_blob(&good), Ok(cal()));

        let empty = CalibrationBlob::from_bytes(&[0u8; 14]).unwrap();
        assert_eq!(TouchCalibration::from_blob(&empty), Err(BlobError::Invalid));

        let mut bad_flags = cal();
        bad_flags.flags = 0x80;
        assert_eq!(
            TouchCalibration::from_blob(&bad_flags.to_blob()),
            Err(BlobError::Invalid)
        );
    }

    #[test]
    fn test_map_corners_and_clamp() {
        let c = cal();
        assert_eq!(c.map(RawTouch { x: 200, y: 300, z: 0 }), Point::new(0, 0));
        assert_eq!(
            c.map(RawTouch { x: 3785, y: 3809, z: 0 }),
            Point::new(239, 319)
        );
        assert_eq!(c.map(RawTouch { x: 0, y: 4095, z: 0 }), Point::new(0, 319));
    }

    #[test]
    fn test_map_swapped_inverted() {
        let mut c = cal();
        c.flags = FLAG_SWAP_XY | FLAG_INVERT_X;
        // Raw Y drives screen X, reversed
        assert_eq!(c.map(RawTouch { x: 300, y: 200, z: 0 }), Point::new(239, 0));
    }
}
