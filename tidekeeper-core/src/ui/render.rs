//! Screen drawing
//!
//! Application screens composed from [`DisplayDriver`] primitives.

use crate::schedule::ScheduleDuration;
use crate::traits::display::{DisplayExt, TextStyle};
use crate::traits::{Color, DisplayDriver, DisplayError};

use super::layout::*;
use super::Flags;

/// Status colour for a flag
fn flag_color(on: bool) -> Color {
    if on {
        Color::GreenYellow
    } else {
        Color::Red
    }
}

/// Screens of the controller UI
pub trait ScreenExt: DisplayExt {
    /// "ATO" and "AWC" header labels
    fn draw_static_ui(&mut self) -> Result<(), DisplayError> {
        let style = TextStyle::plain(HEADER_TEXT_SIZE);
        self.draw_text(ATO_LABEL_POS, "ATO", style)?;
        self.draw_text(AWC_LABEL_POS, "AWC", style)
    }

    /// Clear and redraw the `DD D : HH Hr` readout
    fn draw_time_display(&mut self, schedule: &ScheduleDuration) -> Result<(), DisplayError> {
        self.fill_rect(TIME_AREA, Color::Black)?;

        let digits = TextStyle::plain(TIME_DIGIT_SIZE);
        let units = TextStyle::plain(TIME_UNIT_SIZE);

        self.draw_two_digits(TIME_DAYS_POS, schedule.days(), digits)?;
        self.draw_text(TIME_DAY_UNIT_POS, "D", units)?;
        self.draw_text(TIME_COLON_POS, ":", digits)?;
        self.draw_two_digits(TIME_HOURS_POS, schedule.hours(), digits)?;
        self.draw_text(TIME_HOUR_UNIT_POS, "Hr", units)
    }

    /// ATO ON/OFF and AWC AUTO/MANUAL readouts
    fn draw_status(&mut self, flags: &Flags) -> Result<(), DisplayError> {
        self.fill_rect(ATO_STATUS_AREA, Color::Black)?;
        self.fill_rect(AWC_STATUS_AREA, Color::Black)?;

        let ato = if flags.ato_enabled { "ON" } else { "OFF" };
        let awc = if flags.awc_automatic { "AUTO" } else { "MANUAL" };

        self.draw_text(
            ATO_STATUS_POS,
            ato,
            TextStyle::colored(STATUS_TEXT_SIZE, flag_color(flags.ato_enabled)),
        )?;
        self.draw_text(
            AWC_STATUS_POS,
            awc,
            TextStyle::colored(STATUS_TEXT_SIZE, flag_color(flags.awc_automatic)),
        )
    }

    /// Blank screen with the calibration instruction
    fn draw_calibration_prompt(&mut self) -> Result<(), DisplayError> {
        self.clear(Color::Black)?;
        self.draw_text(
            CALIBRATION_PROMPT_POS,
            CALIBRATION_PROMPT,
            TextStyle::plain(2),
        )
    }
}

impl<T: DisplayDriver> ScreenExt for T {}
