//! Top-level controller
//!
//! Owns the UI mode controller and the water-change sequencer. One call to
//! [`Controller::tick`] is one pass of the control loop: the touch sample is
//! routed through the UI, a manual request starts the sequencer, and the
//! sequencer advances.

use heapless::Vec;

use crate::config::DeviceConfig;
use crate::geometry::Point;
use crate::sequencer::{Sequencer, SequencerError, SequencerEvent, SequencerState};
use crate::traits::{DisplayDriver, DisplayError, FluidIo, PumpCommand};
use crate::ui::{UiController, UiOutput};

/// Sequencer events one tick can produce (start plus poll)
pub const MAX_TICK_SEQUENCER_EVENTS: usize = 8;

/// Everything that happened during a tick, for logging
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub ui: UiOutput,
    pub sequencer: Vec<SequencerEvent, MAX_TICK_SEQUENCER_EVENTS>,
    /// A manual request was refused
    pub rejected: Option<SequencerError>,
}

/// Controller state for the whole device
#[derive(Debug, Clone)]
pub struct Controller {
    ui: UiController,
    sequencer: Sequencer,
}

impl Controller {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            ui: UiController::new(config),
            sequencer: Sequencer::new(config.sequencer),
        }
    }

    pub fn ui(&self) -> &UiController {
        &self.ui
    }

    pub fn sequencer_state(&self) -> SequencerState {
        self.sequencer.state()
    }

    /// Force the pumps off and draw the initial screen
    pub fn startup<D: DisplayDriver, IO: FluidIo>(
        &mut self,
        display: &mut D,
        io: &mut IO,
    ) -> Result<(), DisplayError> {
        io.command(PumpCommand::AllOff);
        self.ui.redraw(display)
    }

    /// One pass of the control loop
    pub fn tick<D: DisplayDriver, IO: FluidIo>(
        &mut self,
        now_ms: u32,
        touch: Option<Point>,
        display: &mut D,
        io: &mut IO,
    ) -> TickReport {
        let mut report = TickReport {
            ui: self.ui.tick(now_ms, touch, display),
            ..TickReport::default()
        };

        if report.ui.manual_requested {
            match self.sequencer.start(now_ms, io) {
                Ok(events) => report.sequencer.extend(events),
                Err(e) => report.rejected = Some(e),
            }
        }

        report.sequencer.extend(self.sequencer.poll(now_ms, io));
        report
    }
}
