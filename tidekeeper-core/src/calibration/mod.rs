//! Touch calibration
//!
//! A 14-byte record maps raw touch readings onto screen pixels. At startup
//! a stored record is applied when it is valid; otherwise the four-corner
//! procedure produces a new one, which is persisted.

mod blob;
mod corners;
pub mod startup;
pub mod store;

pub use blob::{
    BlobError, CalibrationBlob, TouchCalibration, CALIBRATION_BLOB_LEN, FLAG_INVERT_X,
    FLAG_INVERT_Y, FLAG_SWAP_XY,
};
pub use corners::{Corner, CornerCalibration, MARKER_INSET};
pub use startup::{calibrate_touch, CalibrationSource, StartupReport};
pub use store::{load_plan, save, LoadedPlan};

/// Why the corner procedure has to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecalibrateReason {
    /// Nothing stored
    Missing,
    /// Stored record has the wrong size
    WrongLength,
    /// Stored record failed validation
    Invalid,
    /// Stored record was taken on a different panel size
    PanelMismatch,
    /// Configuration asks for a fresh calibration
    Forced,
}

/// Startup decision for the touch calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationPlan {
    /// Use the stored calibration as-is
    Apply(TouchCalibration),
    /// Run the corner procedure and store the result
    Recalibrate(RecalibrateReason),
}

impl CalibrationPlan {
    /// Classify what storage returned
    ///
    /// `stored` is `None` when nothing could be read.
    pub fn decide(stored: Option<&[u8]>, force: bool, width: u16, height: u16) -> Self {
        if force {
            return CalibrationPlan::Recalibrate(RecalibrateReason::Forced);
        }
        let Some(bytes) = stored else {
            return CalibrationPlan::Recalibrate(RecalibrateReason::Missing);
        };

        let decoded = CalibrationBlob::from_bytes(bytes)
            .and_then(|blob| TouchCalibration::from_blob(&blob));
        match decoded {
            Ok(cal) if cal.matches_panel(width, height) => CalibrationPlan::Apply(cal),
            Ok(_) => CalibrationPlan::Recalibrate(RecalibrateReason::PanelMismatch),
            Err(BlobError::WrongLength) => {
                CalibrationPlan::Recalibrate(RecalibrateReason::WrongLength)
            }
            Err(BlobError::Invalid) => CalibrationPlan::Recalibrate(RecalibrateReason::Invalid),
        }
    }
}
