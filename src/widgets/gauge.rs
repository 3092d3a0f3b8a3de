//! Vertical gauge for a bounded value.
//!
//! A dark track of the full gauge height with a bar on top whose height is
//! proportional to the value. Both are vertically centered on the panel's
//! middle row, so the bar grows up and down from the center. The bar fades
//! from white at zero to red at the maximum (see [`gauge_fill`]).

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use super::primitives::fill_centered_rect;
use crate::colors::{GAUGE_TRACK, gauge_fill};
use crate::config::CENTER_Y;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerticalGauge {
    value: u32,
    max: u32,
    width: u32,
    height: u32,
    center_x: i32,
}

impl VerticalGauge {
    /// `max` must be positive; a zero maximum draws an empty track.
    pub const fn new(value: u32, max: u32, width: u32, height: u32, center_x: i32) -> Self {
        Self { value, max, width, height, center_x }
    }

    /// Bar height, `height * value / max` truncated. Values above `max` are clamped.
    pub fn bar_height(&self) -> u32 {
        if self.max == 0 {
            return 0;
        }
        let value = self.value.min(self.max);
        (u64::from(self.height) * u64::from(value) / u64::from(self.max)) as u32
    }

    pub fn bar_color(&self) -> Rgb565 {
        gauge_fill(self.value, self.max)
    }

    pub fn render<D: DrawTarget<Color = Rgb565>>(&self, target: &mut D) {
        fill_centered_rect(target, self.center_x, CENTER_Y, Size::new(self.width, self.height), GAUGE_TRACK);
        fill_centered_rect(
            target,
            self.center_x,
            CENTER_Y,
            Size::new(self.width, self.bar_height()),
            self.bar_color(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics_simulator::SimulatorDisplay;

    use crate::colors::{BLACK, RED, WHITE};
    use crate::config::SCREEN_SIZE;

    #[test]
    fn test_bar_height_endpoints() {
        assert_eq!(VerticalGauge::new(0, 100, 50, 380, 50).bar_height(), 0);
        assert_eq!(VerticalGauge::new(100, 100, 50, 380, 50).bar_height(), 380);
    }

    #[test]
    fn test_bar_height_truncates() {
        // 380 * 33 / 100 = 125.4
        assert_eq!(VerticalGauge::new(33, 100, 50, 380, 50).bar_height(), 125);
    }

    #[test]
    fn test_bar_height_monotonic() {
        let mut previous = 0;
        for value in 0..=100 {
            let height = VerticalGauge::new(value, 100, 50, 380, 50).bar_height();
            assert!(height >= previous, "Bar height must not shrink as value grows ({value})");
            previous = height;
        }
    }

    #[test]
    fn test_bar_height_clamped_above_max() {
        assert_eq!(VerticalGauge::new(150, 100, 50, 380, 50).bar_height(), 380);
    }

    #[test]
    fn test_zero_max_draws_empty_bar() {
        assert_eq!(VerticalGauge::new(10, 0, 50, 380, 50).bar_height(), 0);
    }

    #[test]
    fn test_bar_color_endpoints() {
        assert_eq!(VerticalGauge::new(0, 100, 50, 380, 50).bar_color(), WHITE);
        assert_eq!(VerticalGauge::new(100, 100, 50, 380, 50).bar_color(), RED);
    }

    #[test]
    fn test_render_centered_bar() {
        let mut display = SimulatorDisplay::<Rgb565>::new(SCREEN_SIZE);
        VerticalGauge::new(50, 100, 50, 380, 100).render(&mut display);

        // Half-height bar spans rows 145..335 around the center row
        assert_eq!(display.get_pixel(Point::new(100, CENTER_Y)), gauge_fill(50, 100));
        assert_eq!(display.get_pixel(Point::new(100, 145)), gauge_fill(50, 100));
        assert_eq!(display.get_pixel(Point::new(100, 144)), GAUGE_TRACK);
        assert_eq!(display.get_pixel(Point::new(100, 50)), GAUGE_TRACK);
        assert_eq!(display.get_pixel(Point::new(100, 49)), BLACK);
        // Width 50 centered on x=100 covers 75..124
        assert_eq!(display.get_pixel(Point::new(75, CENTER_Y)), gauge_fill(50, 100));
        assert_eq!(display.get_pixel(Point::new(74, CENTER_Y)), BLACK);
        assert_eq!(display.get_pixel(Point::new(125, CENTER_Y)), BLACK);
    }
}
