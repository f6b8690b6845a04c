//! Per-tick touch routing, edits and redraws

use heapless::Vec;

use crate::config::DeviceConfig;
use crate::geometry::Point;
use crate::schedule::ScheduleDuration;
use crate::traits::{Color, DisplayDriver, DisplayError};

use super::button::{Button, ButtonId, Edge};
use super::layout;
use super::render::ScreenExt;
use super::repeat::RepeatTimer;
use super::{Flags, OperatingMode, UiEvent};

/// Most UI events one tick can produce
pub const MAX_UI_EVENTS: usize = 8;

/// Normal mode controls
#[derive(Debug, Clone)]
pub struct NormalControls {
    pub ato: Button,
    pub awc: Button,
    pub set: Button,
    pub manual: Button,
    pub stop: Button,
}

impl NormalControls {
    pub fn new() -> Self {
        Self {
            ato: layout::ato_button(),
            awc: layout::awc_button(),
            set: layout::set_button(),
            manual: layout::manual_button(),
            stop: layout::stop_button(),
        }
    }

    fn buttons_mut(&mut self) -> [&mut Button; 5] {
        [
            &mut self.ato,
            &mut self.awc,
            &mut self.set,
            &mut self.manual,
            &mut self.stop,
        ]
    }

    fn buttons(&self) -> [&Button; 5] {
        [&self.ato, &self.awc, &self.set, &self.manual, &self.stop]
    }
}

impl Default for NormalControls {
    fn default() -> Self {
        Self::new()
    }
}

/// Edit mode controls with auto-repeat for +/-
#[derive(Debug, Clone)]
pub struct EditControls {
    pub plus: Button,
    pub minus: Button,
    pub save: Button,
    plus_repeat: RepeatTimer,
    minus_repeat: RepeatTimer,
}

impl EditControls {
    pub fn new(repeat_interval_ms: u32) -> Self {
        Self {
            plus: layout::plus_button(),
            minus: layout::minus_button(),
            save: layout::save_button(),
            plus_repeat: RepeatTimer::new(repeat_interval_ms),
            minus_repeat: RepeatTimer::new(repeat_interval_ms),
        }
    }

    fn buttons(&self) -> [&Button; 3] {
        [&self.plus, &self.save, &self.minus]
    }
}

/// The active button set
#[derive(Debug, Clone)]
pub enum Controls {
    Normal(NormalControls),
    Edit(EditControls),
}

impl Controls {
    pub fn mode(&self) -> OperatingMode {
        match self {
            Controls::Normal(_) => OperatingMode::Normal,
            Controls::Edit(_) => OperatingMode::Edit,
        }
    }

    /// Look up an active button
    pub fn button(&self, id: ButtonId) -> Option<&Button> {
        match self {
            Controls::Normal(c) => c.buttons().into_iter().find(|b| b.id() == id),
            Controls::Edit(c) => c.buttons().into_iter().find(|b| b.id() == id),
        }
    }

    fn draw<D: DisplayDriver>(&self, display: &mut D) -> Result<(), DisplayError> {
        match self {
            Controls::Normal(c) => c.buttons().into_iter().try_for_each(|b| b.draw(display, false)),
            Controls::Edit(c) => c.buttons().into_iter().try_for_each(|b| b.draw(display, false)),
        }
    }
}

/// Result of one UI tick
#[derive(Debug, Clone, Default)]
pub struct UiOutput {
    /// Events in the order they happened
    pub events: Vec<UiEvent, MAX_UI_EVENTS>,
    /// Manual saw a just-pressed edge
    pub manual_requested: bool,
    /// First drawing failure, if any
    pub display_error: Option<DisplayError>,
}

impl UiOutput {
    fn push(&mut self, event: UiEvent) {
        // A tick touches at most two buttons, well under capacity
        let _ = self.events.push(event);
    }

    fn drawn(&mut self, result: Result<(), DisplayError>) {
        if let Err(e) = result {
            self.display_error.get_or_insert(e);
        }
    }
}

/// Owns the operator state and routes touch samples to the active controls
#[derive(Debug, Clone)]
pub struct UiController {
    flags: Flags,
    schedule: ScheduleDuration,
    controls: Controls,
    repeat_interval_ms: u32,
}

impl UiController {
    /// Start in Normal mode with the configured power-on values
    pub fn new(config: &DeviceConfig) -> Self {
        Self::with_state(
            Flags {
                ato_enabled: config.defaults.ato_enabled,
                awc_automatic: config.defaults.awc_automatic,
            },
            config.initial_schedule(),
            config.ui.repeat_interval_ms,
        )
    }

    pub fn with_state(flags: Flags, schedule: ScheduleDuration, repeat_interval_ms: u32) -> Self {
        Self {
            flags,
            schedule,
            controls: Controls::Normal(NormalControls::new()),
            repeat_interval_ms,
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.controls.mode()
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn schedule(&self) -> &ScheduleDuration {
        &self.schedule
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Draw the complete screen for the current mode
    pub fn redraw<D: DisplayDriver>(&self, display: &mut D) -> Result<(), DisplayError> {
        display.clear(Color::Black)?;
        display.draw_static_ui()?;
        display.draw_time_display(&self.schedule)?;
        if self.mode() == OperatingMode::Normal {
            display.draw_status(&self.flags)?;
        }
        self.controls.draw(display)
    }

    /// Process one touch sample
    ///
    /// `touch` is the calibrated contact point, or `None` when the panel is
    /// not touched. A mode change requested during the tick takes effect
    /// after every active button has seen the sample.
    pub fn tick<D: DisplayDriver>(
        &mut self,
        now_ms: u32,
        touch: Option<Point>,
        display: &mut D,
    ) -> UiOutput {
        let mut out = UiOutput::default();
        let mut next_mode = None;

        let Self {
            flags,
            schedule,
            controls,
            ..
        } = self;

        match controls {
            Controls::Normal(c) => {
                for button in c.buttons_mut() {
                    if track(button, touch, display, &mut out) {
                        match button.id() {
                            ButtonId::Ato => {
                                flags.ato_enabled = !flags.ato_enabled;
                                out.push(UiEvent::AtoToggled(flags.ato_enabled));
                                out.drawn(display.draw_status(flags));
                            }
                            ButtonId::Awc => {
                                flags.awc_automatic = !flags.awc_automatic;
                                out.push(UiEvent::AwcToggled(flags.awc_automatic));
                                out.drawn(display.draw_status(flags));
                            }
                            ButtonId::Manual => {
                                out.manual_requested = true;
                                out.push(UiEvent::ManualRequested);
                            }
                            ButtonId::Set => next_mode = Some(OperatingMode::Edit),
                            ButtonId::Stop => out.push(UiEvent::StopPressed),
                            _ => {}
                        }
                    }
                }
            }
            Controls::Edit(c) => {
                if track(&mut c.plus, touch, display, &mut out) {
                    c.plus_repeat.arm(now_ms);
                    adjust(schedule, true, display, &mut out);
                }
                if c.plus_repeat.poll(now_ms, c.plus.is_pressed()) {
                    adjust(schedule, true, display, &mut out);
                }

                if track(&mut c.minus, touch, display, &mut out) {
                    c.minus_repeat.arm(now_ms);
                    adjust(schedule, false, display, &mut out);
                }
                if c.minus_repeat.poll(now_ms, c.minus.is_pressed()) {
                    adjust(schedule, false, display, &mut out);
                }

                if track(&mut c.save, touch, display, &mut out) {
                    next_mode = Some(OperatingMode::Normal);
                }
            }
        }

        if let Some(mode) = next_mode {
            self.enter_mode(mode, display, &mut out);
        }

        out
    }

    fn enter_mode<D: DisplayDriver>(&mut self, mode: OperatingMode, display: &mut D, out: &mut UiOutput) {
        self.controls = match mode {
            OperatingMode::Normal => Controls::Normal(NormalControls::new()),
            OperatingMode::Edit => Controls::Edit(EditControls::new(self.repeat_interval_ms)),
        };
        out.push(UiEvent::ModeChanged(mode));
        out.drawn(self.redraw(display));
    }
}

/// Feed the sample to one button, redraw on edges
///
/// Returns `true` on a just-pressed edge.
fn track<D: DisplayDriver>(
    button: &mut Button,
    touch: Option<Point>,
    display: &mut D,
    out: &mut UiOutput,
) -> bool {
    let inside = touch.is_some_and(|p| button.contains(p));
    match button.press(inside) {
        Some(Edge::JustPressed) => {
            out.drawn(button.draw(display, true));
            out.push(UiEvent::Pressed(button.id()));
            true
        }
        Some(Edge::JustReleased) => {
            out.drawn(button.draw(display, false));
            out.push(UiEvent::Released(button.id()));
            false
        }
        None => false,
    }
}

fn adjust<D: DisplayDriver>(
    schedule: &mut ScheduleDuration,
    up: bool,
    display: &mut D,
    out: &mut UiOutput,
) {
    let changed = if up {
        schedule.increment()
    } else {
        schedule.decrement()
    };
    if changed {
        out.push(UiEvent::ScheduleChanged(schedule.total_hours()));
        out.drawn(display.draw_time_display(schedule));
    }
}
