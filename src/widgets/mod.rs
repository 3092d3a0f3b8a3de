//! Drawable components for the status panel.
//!
//! Everything the panel can show is one of a closed set of drawables, wrapped
//! in the [`Drawable`] enum so pushed content and screen elements share one
//! rendering entry point:
//!
//! - [`text`]: static multi-line text, cycling text and positioned text
//! - [`gauge`]: vertical bar gauge with a white-to-red fill
//! - [`image`]: static, interpolated and bouncing sprites
//! - [`primitives`]: shared low-level drawing utilities (scaled text, centered fills)
//!
//! # Rendering Contract
//!
//! `render` draws onto a caller-provided target and never clears it. Stateful
//! drawables (cycling text, interpolated and bouncing images) advance exactly
//! one step per call, so they must be rendered once per frame.

mod gauge;
mod image;
mod primitives;
mod text;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::DrawTarget;

pub use self::gauge::VerticalGauge;
pub use self::image::{BouncingImage, InterpolatedImage, Sprite, StaticImage};
pub use self::primitives::{Scaled, draw_text, draw_text_centered, fill_centered_rect, measure_text};
pub use self::text::{CyclingText, PositionedText, StaticText, line_center_y};

/// Any element the panel can draw.
#[derive(Clone, Debug)]
pub enum Drawable {
    StaticText(StaticText),
    CyclingText(CyclingText),
    PositionedText(PositionedText),
    Gauge(VerticalGauge),
    StaticImage(StaticImage),
    InterpolatedImage(InterpolatedImage),
    BouncingImage(BouncingImage),
}

impl Drawable {
    /// Draw the current frame, advancing animated variants by one step.
    pub fn render<D: DrawTarget<Color = Rgb565>>(&mut self, target: &mut D) {
        match self {
            Self::StaticText(text) => text.render(target),
            Self::CyclingText(text) => text.render(target),
            Self::PositionedText(text) => text.render(target),
            Self::Gauge(gauge) => gauge.render(target),
            Self::StaticImage(image) => image.render(target),
            Self::InterpolatedImage(image) => image.render(target),
            Self::BouncingImage(image) => image.render(target),
        }
    }
}

macro_rules! impl_from_drawable {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Drawable {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_drawable! {
    StaticText => StaticText,
    CyclingText => CyclingText,
    PositionedText => PositionedText,
    Gauge => VerticalGauge,
    StaticImage => StaticImage,
    InterpolatedImage => InterpolatedImage,
    BouncingImage => BouncingImage,
}
