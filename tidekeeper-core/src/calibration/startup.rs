//! Calibration at power-on
//!
//! Applies the stored record when it fits this panel. Otherwise the operator
//! taps the four corner markers and the result is written back once. Nothing
//! here fails: storage problems end up in the [`StartupReport`] and the
//! fresh calibration is used regardless.

use embedded_hal_async::delay::DelayNs;
use tidekeeper_hal::{FlashError, FlashStorage};

use super::{
    load_plan, save, CalibrationPlan, CornerCalibration, RecalibrateReason, TouchCalibration,
};
use crate::geometry::Point;
use crate::traits::{Color, DisplayDriver, RawTouch, TouchPanel};
use crate::ui::layout::CALIBRATION_MARKER_SIZE;
use crate::ui::render::ScreenExt;

/// Touch sampling period while waiting for a corner tap (ms)
pub const TAP_POLL_MS: u32 = 20;

/// Quiet time after release before the next marker is armed (ms)
pub const RELEASE_SETTLE_MS: u32 = 300;

/// Where the session's calibration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationSource {
    /// Stored record applied as-is
    Stored,
    /// Corner procedure ran
    Measured {
        reason: RecalibrateReason,
        /// Outcome of writing the new record
        saved: Result<(), FlashError>,
    },
}

/// What happened during startup calibration, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StartupReport {
    pub calibration: TouchCalibration,
    pub source: CalibrationSource,
    /// Storage read failure other than "not found"
    pub read_error: Option<FlashError>,
    /// Corner sessions thrown away because the taps gave no usable record
    pub rejected_sessions: u8,
    pub display_errors: u16,
    pub touch_errors: u16,
}

/// Produce the calibration to use until the next power cycle
pub async fn calibrate_touch<S, D, T, W>(
    storage: &mut S,
    display: &mut D,
    touch: &mut T,
    delay: &mut W,
    force: bool,
    width: u16,
    height: u16,
) -> StartupReport
where
    S: FlashStorage,
    D: DisplayDriver,
    T: TouchPanel,
    W: DelayNs,
{
    let loaded = load_plan(storage, force, width, height).await;

    let reason = match loaded.plan {
        CalibrationPlan::Apply(calibration) => {
            return StartupReport {
                calibration,
                source: CalibrationSource::Stored,
                read_error: loaded.storage_error,
                rejected_sessions: 0,
                display_errors: 0,
                touch_errors: 0,
            };
        }
        CalibrationPlan::Recalibrate(reason) => reason,
    };

    let mut procedure = Procedure {
        display,
        touch,
        delay,
        display_errors: 0,
        touch_errors: 0,
        rejected_sessions: 0,
    };
    let calibration = procedure.run(width, height).await;
    let saved = save(storage, &calibration).await;

    StartupReport {
        calibration,
        source: CalibrationSource::Measured { reason, saved },
        read_error: loaded.storage_error,
        rejected_sessions: procedure.rejected_sessions,
        display_errors: procedure.display_errors,
        touch_errors: procedure.touch_errors,
    }
}

/// Interactive corner procedure with its error tallies
struct Procedure<'a, D, T, W> {
    display: &'a mut D,
    touch: &'a mut T,
    delay: &'a mut W,
    display_errors: u16,
    touch_errors: u16,
    rejected_sessions: u8,
}

impl<D: DisplayDriver, T: TouchPanel, W: DelayNs> Procedure<'_, D, T, W> {
    /// Show each marker in turn until four taps give a usable calibration
    async fn run(&mut self, width: u16, height: u16) -> TouchCalibration {
        loop {
            if self.display.draw_calibration_prompt().is_err() {
                self.display_errors = self.display_errors.saturating_add(1);
            }

            let mut session = CornerCalibration::new(width, height);
            while let Some(target) = session.target() {
                self.marker(target, Color::White);
                let raw = self.wait_for_tap().await;
                self.marker(target, Color::Black);
                session.record(raw);
            }

            match session.finish() {
                Ok(calibration) => return calibration,
                Err(_) => self.rejected_sessions = self.rejected_sessions.saturating_add(1),
            }
        }
    }

    fn marker(&mut self, at: Point, color: Color) {
        if self
            .display
            .draw_marker(at, CALIBRATION_MARKER_SIZE, color)
            .is_err()
        {
            self.display_errors = self.display_errors.saturating_add(1);
        }
    }

    /// Wait for a press and release, returning the averaged contact reading
    async fn wait_for_tap(&mut self) -> RawTouch {
        let mut sum = (0u32, 0u32, 0u32);
        let mut count = 0u32;

        loop {
            match self.touch.read_raw() {
                Ok(Some(raw)) => {
                    sum.0 += u32::from(raw.x);
                    sum.1 += u32::from(raw.y);
                    sum.2 += u32::from(raw.z);
                    count += 1;
                }
                Ok(None) if count > 0 => break,
                Ok(None) => {}
                Err(_) => self.touch_errors = self.touch_errors.saturating_add(1),
            }
            self.delay.delay_ms(TAP_POLL_MS).await;
        }

        self.delay.delay_ms(RELEASE_SETTLE_MS).await;

        RawTouch {
            x: (sum.0 / count) as u16,
            y: (sum.1 / count) as u16,
            z: (sum.2 / count) as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::CALIBRATION_BLOB_LEN;
    use crate::testing::{MemStorage, RecordingDisplay, ScriptedTouch, TallyDelay};
    use embassy_futures::block_on;

    const W: u16 = 240;
    const H: u16 = 320;

    fn stored() -> TouchCalibration {
        TouchCalibration {
            x_min: 180,
            x_max: 3900,
            y_min: 240,
            y_max: 3850,
            flags: 0,
            width: W,
            height: H,
        }
    }

    /// Linear panel: raw = offset + px * gain
    fn raw_at(p: Point) -> RawTouch {
        RawTouch {
            x: (200 + p.x * 15) as u16,
            y: (300 + p.y * 11) as u16,
            z: 800,
        }
    }

    /// Four good taps at the marker positions, each held for two samples
    fn corner_taps(touch: &mut ScriptedTouch) {
        let session = CornerCalibration::new(W, H);
        for corner in crate::calibration::Corner::ALL {
            touch.tap(raw_at(session.marker(corner)), 2);
        }
    }

    fn run(
        storage: &mut MemStorage,
        touch: &mut ScriptedTouch,
        force: bool,
    ) -> (StartupReport, RecordingDisplay, TallyDelay) {
        let mut display = RecordingDisplay::new();
        let mut delay = TallyDelay::new();
        let report = block_on(calibrate_touch(
            storage,
            &mut display,
            touch,
            &mut delay,
            force,
            W,
            H,
        ));
        (report, display, delay)
    }

    #[test]
    fn test_valid_record_applied_without_writing() {
        let mut storage = MemStorage::with(stored().to_blob().as_bytes());
        let mut touch = ScriptedTouch::new();
        corner_taps(&mut touch);

        let (report, display, _) = run(&mut storage, &mut touch, false);

        assert_eq!(report.source, CalibrationSource::Stored);
        assert_eq!(report.calibration, stored());
        assert_eq!(storage.writes, 0);
        // Panel untouched, no markers shown
        assert!(display.markers.is_empty());
        assert_eq!(touch.remaining(), 8 + 4);
    }

    #[test]
    fn test_missing_record_measured_and_written_once() {
        let mut storage = MemStorage::empty();
        let mut touch = ScriptedTouch::new();
        corner_taps(&mut touch);

        let (report, display, delay) = run(&mut storage, &mut touch, false);

        assert_eq!(
            report.source,
            CalibrationSource::Measured {
                reason: RecalibrateReason::Missing,
                saved: Ok(()),
            }
        );
        assert_eq!(storage.writes, 1);
        assert_eq!(
            storage.data.as_deref(),
            Some(&report.calibration.to_blob().as_bytes()[..])
        );
        assert_eq!(report.calibration.to_blob().as_bytes().len(), CALIBRATION_BLOB_LEN);

        // Each marker drawn, then erased
        assert_eq!(display.markers.len(), 8);
        assert_eq!(display.markers[0], Point::new(15, 15));
        assert_eq!(display.markers[7], Point::new(224, 304));
        assert!(display.has_text(crate::ui::layout::CALIBRATION_PROMPT));

        // Two held samples, then the release settle, per corner
        let per_tap = 2 * u64::from(TAP_POLL_MS) + u64::from(RELEASE_SETTLE_MS);
        assert_eq!(delay.total_ms(), 4 * per_tap);

        let centre = Point::new(120, 160);
        let mapped = report.calibration.map(raw_at(centre));
        assert!((mapped.x - centre.x).abs() <= 1 && (mapped.y - centre.y).abs() <= 1);
    }

    #[test]
    fn test_invalid_record_replaced() {
        let mut storage = MemStorage::with(&[0u8; CALIBRATION_BLOB_LEN]);
        let mut touch = ScriptedTouch::new();
        corner_taps(&mut touch);

        let (report, _, _) = run(&mut storage, &mut touch, false);

        assert!(matches!(
            report.source,
            CalibrationSource::Measured {
                reason: RecalibrateReason::Invalid,
                ..
            }
        ));
        assert_eq!(storage.writes, 1);
    }

    #[test]
    fn test_write_failure_keeps_fresh_calibration() {
        let mut storage = MemStorage::empty();
        storage.write_error = Some(FlashError::Full);
        let mut touch = ScriptedTouch::new();
        corner_taps(&mut touch);

        let (report, _, _) = run(&mut storage, &mut touch, false);

        assert_eq!(
            report.source,
            CalibrationSource::Measured {
                reason: RecalibrateReason::Missing,
                saved: Err(FlashError::Full),
            }
        );
        assert_eq!(storage.writes, 0);
        assert!(report.calibration.is_valid());
        assert_eq!(report.calibration.width, W);
    }

    #[test]
    fn test_forced_recalibration_overwrites_good_record() {
        let mut storage = MemStorage::with(stored().to_blob().as_bytes());
        let mut touch = ScriptedTouch::new();
        corner_taps(&mut touch);

        let (report, _, _) = run(&mut storage, &mut touch, true);

        assert!(matches!(
            report.source,
            CalibrationSource::Measured {
                reason: RecalibrateReason::Forced,
                saved: Ok(()),
            }
        ));
        assert_eq!(storage.writes, 1);
        assert_ne!(report.calibration, stored());
    }

    #[test]
    fn test_unusable_taps_restart_session() {
        let mut storage = MemStorage::empty();
        let mut touch = ScriptedTouch::new();
        // All four taps on the same spot give no usable ranges
        for _ in 0..4 {
            touch.tap(RawTouch { x: 2000, y: 2000, z: 900 }, 1);
        }
        touch.fail_once();
        corner_taps(&mut touch);

        let (report, display, _) = run(&mut storage, &mut touch, false);

        assert_eq!(report.rejected_sessions, 1);
        assert_eq!(report.touch_errors, 1);
        assert_eq!(storage.writes, 1);
        assert_eq!(display.markers.len(), 16);
        assert!(report.calibration.is_valid());
    }

    #[test]
    fn test_read_error_reported_and_recalibrated() {
        let mut storage = MemStorage::empty();
        storage.read_error = Some(FlashError::Storage);
        let mut touch = ScriptedTouch::new();
        corner_taps(&mut touch);

        let (report, _, _) = run(&mut storage, &mut touch, false);

        assert_eq!(report.read_error, Some(FlashError::Storage));
        assert_eq!(storage.writes, 1);
    }
}
