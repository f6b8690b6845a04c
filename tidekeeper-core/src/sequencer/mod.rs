//! Water-change sequencer
//!
//! Drain → settle → refill as a poll-driven state machine. The controller
//! calls [`Sequencer::poll`] from its loop, so the UI keeps running while
//! the tank drains and refills. [`Sequencer::perform_water_change`] drives
//! the same machine to completion with a blocking delay.
//!
//! Floats are checked on a fixed cadence (`poll_interval_ms`). A float that
//! is already satisfied when its stage begins completes the stage on that
//! first check. Each wait can be bounded by a timeout; on expiry both pumps
//! are switched off and the sequencer enters [`SequencerState::Aborted`].

mod state;

pub use state::{AbortReason, SequenceOutcome, SequencerError, SequencerEvent, SequencerState};

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::config::SequencerConfig;
use crate::traits::{FluidIo, PumpCommand};

/// Most events a single `start`/`poll` call can emit
pub const MAX_EVENTS_PER_STEP: usize = 4;

/// Events produced by one sequencer step, in order
pub type SequencerEvents = Vec<SequencerEvent, MAX_EVENTS_PER_STEP>;

/// Drain/refill state machine
#[derive(Debug, Clone)]
pub struct Sequencer {
    config: SequencerConfig,
    state: SequencerState,
    /// When the current stage began (ms)
    stage_started_ms: u32,
    /// When the float for the current stage was last checked (ms)
    last_check_ms: u32,
}

impl Sequencer {
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            config,
            state: SequencerState::Idle,
            stage_started_ms: 0,
            last_check_ms: 0,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// A water change is in flight
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Begin a water change
    ///
    /// Switches the drain pump on and checks the bottom float immediately.
    /// Rejected with [`SequencerError::Busy`] while a sequence is in flight;
    /// the running sequence is left untouched.
    pub fn start<IO: FluidIo>(
        &mut self,
        now_ms: u32,
        io: &mut IO,
    ) -> Result<SequencerEvents, SequencerError> {
        if self.is_active() {
            return Err(SequencerError::Busy);
        }

        let mut events = SequencerEvents::new();
        emit(&mut events, SequencerEvent::Started);

        io.command(PumpCommand::Drain);
        self.enter(SequencerState::Draining, now_ms);
        emit(&mut events, SequencerEvent::DrainStarted);

        self.check_drain(now_ms, io, &mut events);
        Ok(events)
    }

    /// Advance the sequence
    ///
    /// Call regularly (every controller tick is fine); float checks are
    /// rate limited to the configured poll interval.
    pub fn poll<IO: FluidIo>(&mut self, now_ms: u32, io: &mut IO) -> SequencerEvents {
        let mut events = SequencerEvents::new();

        match self.state {
            SequencerState::Idle | SequencerState::Aborted(_) => {}
            SequencerState::Done => {
                self.state = SequencerState::Idle;
            }
            SequencerState::Draining => {
                if self.check_due(now_ms) {
                    self.check_drain(now_ms, io, &mut events);
                }
            }
            SequencerState::Settling => {
                if now_ms.wrapping_sub(self.stage_started_ms) >= self.config.settle_ms {
                    io.command(PumpCommand::Fill);
                    self.enter(SequencerState::Refilling, now_ms);
                    emit(&mut events, SequencerEvent::RefillStarted);
                    self.check_refill(now_ms, io, &mut events);
                }
            }
            SequencerState::Refilling => {
                if self.check_due(now_ms) {
                    self.check_refill(now_ms, io, &mut events);
                }
            }
        }

        events
    }

    /// Run a complete water change, blocking between float checks
    ///
    /// Events are handed to `on_event` as they happen. Time is measured by
    /// the delays issued, in steps of the poll interval.
    pub fn perform_water_change<IO, D, F>(
        &mut self,
        io: &mut IO,
        delay: &mut D,
        mut on_event: F,
    ) -> Result<SequenceOutcome, SequencerError>
    where
        IO: FluidIo,
        D: DelayNs,
        F: FnMut(SequencerEvent),
    {
        let step_ms = self.config.poll_interval_ms.max(1);
        let mut now_ms: u32 = 0;

        for event in self.start(now_ms, io)? {
            on_event(event);
        }

        while self.is_active() {
            delay.delay_ms(step_ms);
            now_ms = now_ms.wrapping_add(step_ms);
            for event in self.poll(now_ms, io) {
                on_event(event);
            }
        }

        let outcome = match self.state {
            SequencerState::Aborted(reason) => SequenceOutcome::Aborted(reason),
            _ => SequenceOutcome::Completed,
        };

        // Done -> Idle
        self.poll(now_ms, io);
        Ok(outcome)
    }

    fn enter(&mut self, state: SequencerState, now_ms: u32) {
        self.state = state;
        self.stage_started_ms = now_ms;
        self.last_check_ms = now_ms;
    }

    fn check_due(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_check_ms) >= self.config.poll_interval_ms {
            self.last_check_ms = now_ms;
            true
        } else {
            false
        }
    }

    fn check_drain<IO: FluidIo>(&mut self, now_ms: u32, io: &mut IO, events: &mut SequencerEvents) {
        if io.bottom_high() {
            io.command(PumpCommand::AllOff);
            self.enter(SequencerState::Settling, now_ms);
            emit(events, SequencerEvent::DrainComplete);
        } else if self.timed_out(now_ms, self.config.drain_timeout_s) {
            self.abort(AbortReason::DrainTimeout, io, events);
        }
    }

    fn check_refill<IO: FluidIo>(&mut self, now_ms: u32, io: &mut IO, events: &mut SequencerEvents) {
        if io.top_high() {
            io.command(PumpCommand::AllOff);
            self.enter(SequencerState::Done, now_ms);
            emit(events, SequencerEvent::RefillComplete);
        } else if self.timed_out(now_ms, self.config.fill_timeout_s) {
            self.abort(AbortReason::FillTimeout, io, events);
        }
    }

    /// A timeout of zero never expires
    fn timed_out(&self, now_ms: u32, timeout_s: u32) -> bool {
        timeout_s != 0
            && now_ms.wrapping_sub(self.stage_started_ms) >= timeout_s.saturating_mul(1000)
    }

    fn abort<IO: FluidIo>(&mut self, reason: AbortReason, io: &mut IO, events: &mut SequencerEvents) {
        io.command(PumpCommand::AllOff);
        self.state = SequencerState::Aborted(reason);
        emit(events, SequencerEvent::Aborted(reason));
    }
}

fn emit(events: &mut SequencerEvents, event: SequencerEvent) {
    // Capacity covers the longest step (start + immediate drain completion)
    let _ = events.push(event);
}
