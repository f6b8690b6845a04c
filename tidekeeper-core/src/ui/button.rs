//! Touch buttons with press/release edge detection

use crate::geometry::{Point, Rect};
use crate::traits::display::ButtonStyle;
use crate::traits::{DisplayDriver, DisplayError};

/// Identity of every on-screen control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Ato,
    Awc,
    Set,
    Manual,
    Stop,
    Plus,
    Minus,
    Save,
}

/// Per-button contact state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressState {
    /// Not touched
    #[default]
    Idle,
    /// Touched, contact inside the region
    Pressed,
    /// Contact ended or left the region on this tick
    Released,
}

/// Transition reported by [`Button::press`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    JustPressed,
    JustReleased,
}

/// A rectangular touch control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    id: ButtonId,
    region: Rect,
    style: ButtonStyle,
    state: PressState,
}

impl Button {
    pub const fn new(id: ButtonId, region: Rect, style: ButtonStyle) -> Self {
        Self {
            id,
            region,
            style,
            state: PressState::Idle,
        }
    }

    pub fn id(&self) -> ButtonId {
        self.id
    }

    pub fn region(&self) -> Rect {
        self.region
    }

    pub fn style(&self) -> &ButtonStyle {
        &self.style
    }

    pub fn state(&self) -> PressState {
        self.state
    }

    /// Contact is currently held inside the region
    pub fn is_pressed(&self) -> bool {
        self.state == PressState::Pressed
    }

    /// Hit test against this button's region
    pub fn contains(&self, p: Point) -> bool {
        self.region.contains(p)
    }

    /// Feed one touch sample
    ///
    /// `inside` is true when the panel is touched within this button.
    /// A contiguous touch yields exactly one `JustPressed` followed by
    /// exactly one `JustReleased`.
    pub fn press(&mut self, inside: bool) -> Option<Edge> {
        let was_pressed = self.is_pressed();
        match (was_pressed, inside) {
            (false, true) => {
                self.state = PressState::Pressed;
                Some(Edge::JustPressed)
            }
            (true, true) => None,
            (true, false) => {
                self.state = PressState::Released;
                Some(Edge::JustReleased)
            }
            (false, false) => {
                self.state = PressState::Idle;
                None
            }
        }
    }

    /// Draw in the normal or pressed visual state
    pub fn draw<D: DisplayDriver>(&self, display: &mut D, pressed: bool) -> Result<(), DisplayError> {
        display.draw_button(self.region, &self.style, pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Color;

    fn button() -> Button {
        Button::new(
            ButtonId::Ato,
            Rect::from_center(50, 200, 60, 40),
            ButtonStyle {
                outline: Color::Cyan,
                fill: Color::DarkGrey,
                text: Color::Black,
                label: "ATO",
                text_size: 2,
            },
        )
    }

    #[test]
    fn test_single_touch_yields_one_edge_pair() {
        let mut b = button();
        let samples = [false, true, true, true, true, false, false];
        let mut pressed = 0;
        let mut released = 0;
        for inside in samples {
            match b.press(inside) {
                Some(Edge::JustPressed) => pressed += 1,
                Some(Edge::JustReleased) => released += 1,
                None => {}
            }
        }
        assert_eq!(pressed, 1);
        assert_eq!(released, 1);
        assert_eq!(b.state(), PressState::Idle);
    }

    #[test]
    fn test_states() {
        let mut b = button();
        assert_eq!(b.state(), PressState::Idle);
        b.press(true);
        assert_eq!(b.state(), PressState::Pressed);
        assert!(b.is_pressed());
        b.press(false);
        assert_eq!(b.state(), PressState::Released);
        assert!(!b.is_pressed());
        b.press(false);
        assert_eq!(b.state(), PressState::Idle);
    }

    #[test]
    fn test_slide_off_releases() {
        let mut b = button();
        assert_eq!(b.press(true), Some(Edge::JustPressed));
        // Finger still down but moved outside the region
        assert_eq!(b.press(false), Some(Edge::JustReleased));
        // Sliding back in counts as a new press
        assert_eq!(b.press(true), Some(Edge::JustPressed));
    }

    #[test]
    fn test_contains_uses_region() {
        let b = button();
        assert!(b.contains(Point::new(50, 200)));
        assert!(!b.contains(Point::new(90, 200)));
    }
}
