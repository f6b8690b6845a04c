//! Pump and level sensor traits
//!
//! The water path is two pumps (drain, fill) and two float switches
//! (bottom, top). Pumps are only ever driven through [`PumpCommand`], which
//! has no variant for both pumps running.

/// Trait for a binary pump output (relay, MOSFET or SSR)
pub trait Pump {
    /// Switch the pump on or off
    fn set_running(&mut self, running: bool);

    /// Check if the pump is currently commanded on
    fn is_running(&self) -> bool;
}

/// Trait for a binary float switch
///
/// Reports the raw electrical level. The switches are wired active-low
/// with pull-ups, so HIGH means the float is not triggered.
pub trait LevelSensor {
    /// Sample the switch; `&mut self` because reads may need the peripheral
    fn is_high(&mut self) -> bool;
}

/// Pump output combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PumpCommand {
    /// Both pumps off
    AllOff,
    /// Drain pump on, fill pump off
    Drain,
    /// Fill pump on, drain pump off
    Fill,
}

/// The complete water path as seen by the sequencer
pub trait FluidIo {
    /// Apply a pump command
    ///
    /// Implementations switch the outgoing pump off before switching the
    /// incoming pump on.
    fn command(&mut self, command: PumpCommand);

    /// Drain pump is on
    fn drain_running(&self) -> bool;

    /// Fill pump is on
    fn fill_running(&self) -> bool;

    /// Bottom float reads HIGH (tank drained)
    fn bottom_high(&mut self) -> bool;

    /// Top float reads HIGH (tank full)
    fn top_high(&mut self) -> bool;
}

/// [`FluidIo`] built from two pumps and two sensors
pub struct FluidStation<D, F, B, T> {
    drain: D,
    fill: F,
    bottom: B,
    top: T,
}

impl<D: Pump, F: Pump, B: LevelSensor, T: LevelSensor> FluidStation<D, F, B, T> {
    /// Create a station with both pumps forced off
    pub fn new(drain: D, fill: F, bottom: B, top: T) -> Self {
        let mut station = Self {
            drain,
            fill,
            bottom,
            top,
        };
        station.command(PumpCommand::AllOff);
        station
    }

    /// Release the underlying devices
    pub fn release(self) -> (D, F, B, T) {
        (self.drain, self.fill, self.bottom, self.top)
    }
}

impl<D: Pump, F: Pump, B: LevelSensor, T: LevelSensor> FluidIo for FluidStation<D, F, B, T> {
    fn command(&mut self, command: PumpCommand) {
        match command {
            PumpCommand::AllOff => {
                self.drain.set_running(false);
                self.fill.set_running(false);
            }
            PumpCommand::Drain => {
                self.fill.set_running(false);
                self.drain.set_running(true);
            }
            PumpCommand::Fill => {
                self.drain.set_running(false);
                self.fill.set_running(true);
            }
        }
    }

    fn drain_running(&self) -> bool {
        self.drain.is_running()
    }

    fn fill_running(&self) -> bool {
        self.fill.is_running()
    }

    fn bottom_high(&mut self) -> bool {
        self.bottom.is_high()
    }

    fn top_high(&mut self) -> bool {
        self.top.is_high()
    }
}
