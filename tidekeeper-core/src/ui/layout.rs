//! Screen layout for the 240x320 portrait panel

use crate::geometry::{Point, Rect};
use crate::traits::display::ButtonStyle;
use crate::traits::Color;

use super::button::{Button, ButtonId};

/// Header labels
pub const ATO_LABEL_POS: Point = Point::new(10, 5);
pub const AWC_LABEL_POS: Point = Point::new(140, 5);
pub const HEADER_TEXT_SIZE: u8 = 3;

/// Flag status readouts and the areas cleared before redrawing them
pub const ATO_STATUS_POS: Point = Point::new(70, 10);
pub const AWC_STATUS_POS: Point = Point::new(200, 10);
pub const ATO_STATUS_AREA: Rect = Rect::new(70, 10, 40, 15);
pub const AWC_STATUS_AREA: Rect = Rect::new(200, 10, 50, 15);
pub const STATUS_TEXT_SIZE: u8 = 1;

/// Schedule readout: `DD D : HH Hr`
pub const TIME_AREA: Rect = Rect::new(25, 70, 200, 50);
pub const TIME_DAYS_POS: Point = Point::new(25, 70);
pub const TIME_DAY_UNIT_POS: Point = Point::new(95, 100);
pub const TIME_COLON_POS: Point = Point::new(105, 70);
pub const TIME_HOURS_POS: Point = Point::new(135, 70);
pub const TIME_HOUR_UNIT_POS: Point = Point::new(205, 100);
pub const TIME_DIGIT_SIZE: u8 = 6;
pub const TIME_UNIT_SIZE: u8 = 2;

/// Calibration prompt
pub const CALIBRATION_PROMPT_POS: Point = Point::new(20, 0);
pub const CALIBRATION_PROMPT: &str = "Touch corners as directed";
pub const CALIBRATION_MARKER_SIZE: u32 = 15;

const BUTTON_TEXT_SIZE: u8 = 2;

const fn neutral(label: &'static str) -> ButtonStyle {
    ButtonStyle {
        outline: Color::Cyan,
        fill: Color::DarkGrey,
        text: Color::Black,
        label,
        text_size: BUTTON_TEXT_SIZE,
    }
}

const fn confirm(label: &'static str) -> ButtonStyle {
    ButtonStyle {
        outline: Color::GreenYellow,
        fill: Color::DarkGreen,
        text: Color::Black,
        label,
        text_size: BUTTON_TEXT_SIZE,
    }
}

const STOP_STYLE: ButtonStyle = ButtonStyle {
    outline: Color::White,
    fill: Color::Red,
    text: Color::White,
    label: "STOP",
    text_size: BUTTON_TEXT_SIZE,
};

pub fn ato_button() -> Button {
    Button::new(ButtonId::Ato, Rect::from_center(50, 200, 60, 40), neutral("ATO"))
}

pub fn awc_button() -> Button {
    Button::new(ButtonId::Awc, Rect::from_center(120, 200, 60, 40), neutral("AWC"))
}

pub fn set_button() -> Button {
    Button::new(ButtonId::Set, Rect::from_center(190, 200, 60, 40), confirm("SET"))
}

pub fn manual_button() -> Button {
    Button::new(
        ButtonId::Manual,
        Rect::from_center(60, 260, 90, 40),
        neutral("Manual"),
    )
}

pub fn stop_button() -> Button {
    Button::new(ButtonId::Stop, Rect::from_center(195, 260, 60, 40), STOP_STYLE)
}

pub fn plus_button() -> Button {
    Button::new(ButtonId::Plus, Rect::from_center(40, 150, 50, 40), neutral("+"))
}

pub fn save_button() -> Button {
    Button::new(ButtonId::Save, Rect::from_center(120, 150, 80, 40), confirm("SAVE"))
}

pub fn minus_button() -> Button {
    Button::new(ButtonId::Minus, Rect::from_center(200, 150, 50, 40), neutral("-"))
}
