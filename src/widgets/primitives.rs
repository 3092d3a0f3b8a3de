//! Low-level drawing primitives shared across widgets.
//!
//! # Scaled Text
//!
//! Mono fonts render at their native glyph size. [`Scaled`] wraps a draw
//! target and magnifies every incoming pixel into a `scale × scale` block
//! anchored at an origin, which is how large text is produced from the 24 point
//! font. Text is always laid out with a top baseline at the wrapper's origin so
//! measuring and drawing agree on the same box.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::styles::TextFace;

/// Draw target adapter that magnifies pixels by an integer factor.
pub struct Scaled<'a, D> {
    target: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<'a, D: DrawTarget> Scaled<'a, D> {
    /// Wrap `target` so that logical pixel `p` covers the block at
    /// `origin + p * scale`. A zero scale is treated as 1.
    pub fn new(target: &'a mut D, origin: Point, scale: u32) -> Self {
        Self { target, origin, scale: scale.max(1) }
    }
}

impl<D: DrawTarget> Dimensions for Scaled<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        let outer = self.target.bounding_box();
        let scale = self.scale as i32;
        let offset = outer.top_left - self.origin;
        Rectangle::new(
            Point::new(offset.x.div_euclid(scale), offset.y.div_euclid(scale)),
            Size::new(outer.size.width / self.scale + 1, outer.size.height / self.scale + 1),
        )
    }
}

impl<D: DrawTarget> DrawTarget for Scaled<'_, D> {
    type Color = D::Color;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let block = Size::new_equal(self.scale);
        for Pixel(point, color) in pixels {
            let top_left = self.origin + point * self.scale as i32;
            self.target.fill_solid(&Rectangle::new(top_left, block), color)?;
        }
        Ok(())
    }
}

/// Size of `text` on the panel when rendered with `face`.
pub fn measure_text(text: &str, face: &TextFace) -> Size {
    let bounds = Text::with_baseline(text, Point::zero(), face.style(Rgb565::WHITE), Baseline::Top).bounding_box();
    bounds.size * face.scale
}

/// Draw `text` with its top-left corner at `top_left`.
pub fn draw_text<D>(target: &mut D, text: &str, face: &TextFace, color: Rgb565, top_left: Point)
where
    D: DrawTarget<Color = Rgb565>,
{
    let mut scaled = Scaled::new(target, top_left, face.scale);
    Text::with_baseline(text, Point::zero(), face.style(color), Baseline::Top)
        .draw(&mut scaled)
        .ok();
}

/// Draw `text` centered on `center`, measured by its rendered size.
pub fn draw_text_centered<D>(target: &mut D, text: &str, face: &TextFace, color: Rgb565, center: Point)
where
    D: DrawTarget<Color = Rgb565>,
{
    let size = measure_text(text, face);
    let top_left = center - Point::new((size.width / 2) as i32, (size.height / 2) as i32);
    draw_text(target, text, face, color, top_left);
}

/// Fill a rectangle whose horizontal center is `center_x` and vertical center is `center_y`.
pub fn fill_centered_rect<D>(target: &mut D, center_x: i32, center_y: i32, size: Size, color: Rgb565)
where
    D: DrawTarget<Color = Rgb565>,
{
    if size.width == 0 || size.height == 0 {
        return;
    }
    let top_left = Point::new(center_x - (size.width / 2) as i32, center_y - (size.height / 2) as i32);
    Rectangle::new(top_left, size)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)
        .ok();
}
