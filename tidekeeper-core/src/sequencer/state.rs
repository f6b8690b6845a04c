//! Sequencer states, events and errors

/// Water-change sequence state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerState {
    /// No water change in progress
    #[default]
    Idle,
    /// Drain pump running, waiting for the bottom float
    Draining,
    /// Both pumps off, letting residual flow stop
    Settling,
    /// Fill pump running, waiting for the top float
    Refilling,
    /// Sequence finished; becomes Idle on the next poll
    Done,
    /// A stage exceeded its time window; both pumps are off
    Aborted(AbortReason),
}

impl SequencerState {
    /// A sequence is in flight and owns the pumps
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SequencerState::Draining | SequencerState::Settling | SequencerState::Refilling
        )
    }

    /// Check if this is an abort state
    pub fn is_aborted(&self) -> bool {
        matches!(self, SequencerState::Aborted(_))
    }
}

/// Why a sequence was aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AbortReason {
    /// Bottom float never reported the tank drained
    DrainTimeout,
    /// Top float never reported the tank full
    FillTimeout,
}

/// Progress notifications emitted by the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerEvent {
    /// A water change was accepted
    Started,
    /// Drain pump switched on
    DrainStarted,
    /// Bottom float satisfied, drain pump switched off
    DrainComplete,
    /// Fill pump switched on
    RefillStarted,
    /// Top float satisfied, fill pump switched off
    RefillComplete,
    /// Sequence aborted with both pumps off
    Aborted(AbortReason),
}

impl SequencerEvent {
    /// Operator-facing log line
    pub fn message(&self) -> &'static str {
        match self {
            SequencerEvent::Started => "Starting water change...",
            SequencerEvent::DrainStarted => "Motor1 ON: Draining...",
            SequencerEvent::DrainComplete => "Drain complete. Motor1 OFF.",
            SequencerEvent::RefillStarted => "Motor2 ON: Refilling...",
            SequencerEvent::RefillComplete => "Refill complete. Motor2 OFF.",
            SequencerEvent::Aborted(_) => "sequence aborted: sensor timeout",
        }
    }
}

/// Sequencer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerError {
    /// A water change is already in progress
    Busy,
}

/// How a blocking water change ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceOutcome {
    Completed,
    Aborted(AbortReason),
}
