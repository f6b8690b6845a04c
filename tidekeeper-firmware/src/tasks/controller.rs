//! Main controller task
//!
//! Runs the control loop on every tick: reads the touch panel, maps the
//! sample through the calibration, lets the controller update the screen
//! and the pumps, and logs what happened.

use defmt::*;

use tidekeeper_core::calibration::TouchCalibration;
use tidekeeper_core::config::DeviceConfig;
use tidekeeper_core::geometry::Point;
use tidekeeper_core::sequencer::SequencerEvent;
use tidekeeper_core::traits::TouchPanel;
use tidekeeper_core::{Controller, TickReport};

use crate::board::{Display, Station, Touch};
use crate::tasks::tick::TICK_SIGNAL;

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(
    config: &'static DeviceConfig,
    mut display: Display,
    mut touch: Touch,
    mut station: Station,
    calibration: TouchCalibration,
) {
    info!("Controller task started");

    let mut controller = Controller::new(config);
    if let Err(e) = controller.startup(&mut display, &mut station) {
        warn!("Display error during startup: {:?}", e);
    }

    loop {
        let now_ms = TICK_SIGNAL.wait().await;

        let point = read_touch(&mut touch, &calibration);
        let report = controller.tick(now_ms, point, &mut display, &mut station);
        log_report(&report);
    }
}

/// Sample the panel and convert to screen coordinates
fn read_touch(touch: &mut Touch, calibration: &TouchCalibration) -> Option<Point> {
    match touch.read_raw() {
        Ok(Some(raw)) => {
            let p = calibration.map(raw);
            trace!("Touch raw ({}, {}) -> ({}, {})", raw.x, raw.y, p.x, p.y);
            Some(p)
        }
        Ok(None) => None,
        Err(e) => {
            warn!("Touch read error: {:?}", e);
            None
        }
    }
}

fn log_report(report: &TickReport) {
    for event in &report.ui.events {
        match event.message() {
            Some(msg) => info!("{}", msg),
            None => debug!("UI: {:?}", event),
        }
    }

    if let Some(e) = report.ui.display_error {
        warn!("Display error: {:?}", e);
    }

    if let Some(e) = report.rejected {
        warn!("Manual water change ignored: {:?}", e);
    }

    for event in &report.sequencer {
        match event {
            SequencerEvent::Aborted(reason) => error!("{} ({:?})", event.message(), reason),
            _ => info!("{}", event.message()),
        }
    }
}
