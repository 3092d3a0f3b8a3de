//! Text drawables: static multi-line text, cycling text and positioned text.
//!
//! Pushed text (static and cycling) is laid out in the area below the idle
//! logo, centered on [`TEXT_CENTER_Y`]. Positioned text is placed by its
//! caller and does no layout of its own.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use super::primitives::draw_text_centered;
use crate::colors::WHITE;
use crate::config::{CENTER_X, LINE_PITCH, TEXT_CENTER_Y, TEXT_SIZE};
use crate::styles::TextFace;

/// Vertical center of line `index` in a block of `count` lines.
pub fn line_center_y(index: usize, count: usize) -> i32 {
    let first = TEXT_CENTER_Y - (LINE_PITCH * (count.saturating_sub(1)) as i32) / 2;
    first + LINE_PITCH * index as i32
}

// =============================================================================
// Static Text
// =============================================================================

/// A block of lines, each centered horizontally, stacked at a fixed pitch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticText {
    lines: Vec<String>,
}

impl StaticText {
    /// Split `text` on line breaks.
    pub fn new(text: &str) -> Self {
        Self { lines: text.split('\n').map(str::to_owned).collect() }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render<D: DrawTarget<Color = Rgb565>>(&self, target: &mut D) {
        let face = TextFace::for_size(TEXT_SIZE);
        let count = self.lines.len();
        for (index, line) in self.lines.iter().enumerate() {
            draw_text_centered(target, line, &face, WHITE, Point::new(CENTER_X, line_center_y(index, count)));
        }
    }
}

// =============================================================================
// Cycling Text
// =============================================================================

/// A sequence of strings shown one per frame, wrapping around.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CyclingText {
    states: Vec<String>,
    current: usize,
}

impl CyclingText {
    pub fn new(states: Vec<String>) -> Self {
        Self { states, current: 0 }
    }

    /// Index of the string the next render will show.
    #[inline]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// The string the next render will show.
    pub fn current(&self) -> Option<&str> {
        self.states.get(self.current).map(String::as_str)
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Show the current string, then advance to the next one.
    pub fn render<D: DrawTarget<Color = Rgb565>>(&mut self, target: &mut D) {
        let Some(text) = self.states.get(self.current) else {
            return;
        };
        let face = TextFace::for_size(TEXT_SIZE);
        draw_text_centered(target, text, &face, WHITE, Point::new(CENTER_X, line_center_y(0, 1)));
        self.current = (self.current + 1) % self.states.len();
    }
}

// =============================================================================
// Positioned Text
// =============================================================================

/// A single string centered on a caller-given point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionedText {
    text: String,
    center: Point,
    size: u32,
}

impl PositionedText {
    pub fn new(text: impl Into<String>, center: Point, size: u32) -> Self {
        Self { text: text.into(), center, size }
    }

    pub fn render<D: DrawTarget<Color = Rgb565>>(&self, target: &mut D) {
        let face = TextFace::for_size(self.size);
        draw_text_centered(target, &self.text, &face, WHITE, self.center);
    }
}
