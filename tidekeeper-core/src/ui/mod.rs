//! UI mode controller
//!
//! Two operating modes share the touch panel. Normal mode exposes the flag
//! toggles, the manual water change and the entry into Edit mode; Edit mode
//! exposes the schedule editor. The active button set is a tagged variant
//! built fresh on every mode entry, so no press state survives a mode
//! change.

pub mod button;
pub mod controller;
pub mod layout;
pub mod render;
pub mod repeat;

pub use button::{Button, ButtonId, Edge, PressState};
pub use controller::{Controls, EditControls, NormalControls, UiController, UiOutput};
pub use render::ScreenExt;
pub use repeat::RepeatTimer;

/// Operating mode of the touch UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    Normal,
    Edit,
}

/// Operator flags (in memory only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Flags {
    /// Automatic top-off enabled
    pub ato_enabled: bool,
    /// Automatic (true) or manual water change mode
    pub awc_automatic: bool,
}

/// Things that happened during a UI tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiEvent {
    /// Button saw a just-pressed edge
    Pressed(ButtonId),
    /// Button saw a just-released edge
    Released(ButtonId),
    /// ATO flag toggled to the contained value
    AtoToggled(bool),
    /// AWC flag toggled to the contained value
    AwcToggled(bool),
    /// Schedule changed; new total hours
    ScheduleChanged(u16),
    /// Mode switched
    ModeChanged(OperatingMode),
    /// Manual water change requested
    ManualRequested,
    /// Stop pressed; no action is bound to it
    StopPressed,
}

impl UiEvent {
    /// Operator-facing log line, for the events that have one
    pub fn message(&self) -> Option<&'static str> {
        match self {
            UiEvent::ManualRequested => Some("Manual Water Change Triggered!"),
            _ => None,
        }
    }
}
