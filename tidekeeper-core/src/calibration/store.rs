//! Calibration persistence on top of [`FlashStorage`]

use tidekeeper_hal::{FlashError, FlashStorage, StorageKey};

use super::{CalibrationPlan, RecalibrateReason, TouchCalibration};

/// Read buffer; larger than a valid record so oversize data is detected
const READ_BUFFER_LEN: usize = 32;

/// Outcome of reading the stored calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadedPlan {
    pub plan: CalibrationPlan,
    /// Storage failure other than "not found", for logging
    pub storage_error: Option<FlashError>,
}

/// Read the stored record and decide whether to recalibrate
///
/// Storage failures never propagate: they lead to recalibration.
pub async fn load_plan<S: FlashStorage>(
    storage: &mut S,
    force: bool,
    width: u16,
    height: u16,
) -> LoadedPlan {
    let mut buffer = [0u8; READ_BUFFER_LEN];
    match storage.read(StorageKey::TouchCalibration, &mut buffer).await {
        Ok(len) => LoadedPlan {
            plan: CalibrationPlan::decide(buffer.get(..len), force, width, height),
            storage_error: None,
        },
        Err(FlashError::NotFound) => LoadedPlan {
            plan: CalibrationPlan::decide(None, force, width, height),
            storage_error: None,
        },
        Err(FlashError::BufferTooSmall) => LoadedPlan {
            plan: CalibrationPlan::Recalibrate(if force {
                RecalibrateReason::Forced
            } else {
                RecalibrateReason::WrongLength
            }),
            storage_error: None,
        },
        Err(e) => LoadedPlan {
            plan: CalibrationPlan::decide(None, force, width, height),
            storage_error: Some(e),
        },
    }
}

/// Persist a calibration record
pub async fn save<S: FlashStorage>(
    storage: &mut S,
    calibration: &TouchCalibration,
) -> Result<(), FlashError> {
    let blob = calibration.to_blob();
    storage
        .write(StorageKey::TouchCalibration, blob.as_bytes())
        .await
}
