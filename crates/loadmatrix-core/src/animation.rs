//! Two-frame idle animation shown when the load average rounds to zero

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};

use crate::frame::Frame;

/// Which of the two idle frames is up next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnimationSlot {
    #[default]
    First,
    Second,
}

impl AnimationSlot {
    pub const fn toggle(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// Precomputed idle frames plus the slot to show next.
#[derive(Debug, Clone)]
pub struct AnimationState {
    frames: [Frame; 2],
    current: AnimationSlot,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationState {
    pub fn new() -> Self {
        Self {
            frames: [idle_upright(), idle_sideways()],
            current: AnimationSlot::First,
        }
    }

    pub const fn current_slot(&self) -> AnimationSlot {
        self.current
    }

    pub fn frame(&self, slot: AnimationSlot) -> &Frame {
        &self.frames[slot.index()]
    }

    /// Return the frame for the current slot and flip to the other one.
    pub fn advance(&mut self) -> Frame {
        let frame = self.frames[self.current.index()];
        self.current = self.current.toggle();
        frame
    }
}

// An "I": top and bottom serifs with a two-pixel stem.
fn idle_upright() -> Frame {
    let mut frame = Frame::blank();
    stroke(&mut frame, Point::new(1, 1), Point::new(6, 1));
    stroke(&mut frame, Point::new(1, 6), Point::new(6, 6));
    fill(&mut frame, Point::new(3, 2), Point::new(4, 5));
    frame
}

// The same glyph turned a quarter: side serifs with a two-pixel bar.
fn idle_sideways() -> Frame {
    let mut frame = Frame::blank();
    stroke(&mut frame, Point::new(1, 1), Point::new(1, 6));
    stroke(&mut frame, Point::new(6, 1), Point::new(6, 6));
    fill(&mut frame, Point::new(2, 3), Point::new(5, 4));
    frame
}

fn stroke(frame: &mut Frame, start: Point, end: Point) {
    Line::new(start, end)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(frame)
        .unwrap_or_else(|never| match never {});
}

fn fill(frame: &mut Frame, corner_1: Point, corner_2: Point) {
    Rectangle::with_corners(corner_1, corner_2)
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(frame)
        .unwrap_or_else(|never| match never {});
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_toggle() {
        assert_eq!(AnimationSlot::First.toggle(), AnimationSlot::Second);
        assert_eq!(AnimationSlot::Second.toggle(), AnimationSlot::First);
    }

    #[test]
    fn test_idle_frames_differ() {
        let state = AnimationState::new();
        let first = state.frame(AnimationSlot::First);
        let second = state.frame(AnimationSlot::Second);
        assert_ne!(first, second);
        // 6 + 6 serif pixels plus an 8-pixel stem in both orientations
        assert_eq!(first.lit_count(), 20);
        assert_eq!(second.lit_count(), 20);
    }

    #[test]
    fn test_upright_glyph_layout() {
        let frame = idle_upright();
        let expected = "\
........
.######.
...##...
...##...
...##...
...##...
.######.
........";
        assert_eq!(frame.to_string(), expected);
    }

    #[test]
    fn test_advance_alternates_strictly() {
        let mut state = AnimationState::new();
        let mut shown = Vec::new();
        for _ in 0..6 {
            let before = state.current_slot();
            shown.push(state.advance());
            assert_eq!(state.current_slot(), before.toggle());
        }

        for pair in shown.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(shown[0], shown[2]);
        assert_eq!(shown[1], shown[3]);
    }
}
