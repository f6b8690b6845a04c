//! Touch calibration startup
//!
//! Runs the power-on calibration on the real panel and logs how it went.

use defmt::*;
use embassy_time::Delay;

use tidekeeper_core::calibration::{self, CalibrationSource, StartupReport, TouchCalibration};
use tidekeeper_core::traits::{DisplayDriver, TouchPanel};
use tidekeeper_hal_rp2040::FlashStorageTrait;

/// Produce the calibration to use for this session
///
/// Never fails: a write failure is logged and the fresh calibration is
/// still used until the next power cycle.
pub async fn calibrate_touch<S, D, T>(
    storage: &mut S,
    display: &mut D,
    touch: &mut T,
    force: bool,
    width: u16,
    height: u16,
) -> TouchCalibration
where
    S: FlashStorageTrait,
    D: DisplayDriver,
    T: TouchPanel,
{
    let report =
        calibration::calibrate_touch(storage, display, touch, &mut Delay, force, width, height)
            .await;
    log_report(&report);
    report.calibration
}

fn log_report(report: &StartupReport) {
    if let Some(e) = report.read_error {
        warn!("Failed to read touch calibration: {:?}", e);
    }

    match report.source {
        CalibrationSource::Stored => info!("Loaded touch calibration from flash"),
        CalibrationSource::Measured { reason, saved } => {
            info!("Touch calibrated ({:?})", reason);
            match saved {
                Ok(()) => info!("Saved touch calibration to flash"),
                Err(e) => warn!("Failed to save touch calibration: {:?}", e),
            }
        }
    }

    if report.rejected_sessions > 0 {
        warn!(
            "Discarded {} calibration attempt(s) with unusable taps",
            report.rejected_sessions
        );
    }
    if report.display_errors > 0 || report.touch_errors > 0 {
        warn!(
            "Calibration saw {} display and {} touch errors",
            report.display_errors, report.touch_errors
        );
    }

    let cal = &report.calibration;
    debug!(
        "Touch calibration: x {}..{} y {}..{} flags {:#x} panel {}x{}",
        cal.x_min, cal.x_max, cal.y_min, cal.y_max, cal.flags, cal.width, cal.height
    );
}
