//! Idle screen shown in the Sleep state.
//!
//! ```text
//! ┌──────────────────────────────┐      ┌──────────────────────────────┐
//! │          ┌────────┐          │      │    ┌────────┐                │
//! │          │  logo  │          │      │    │  logo  │ ↘              │
//! │          └────────┘          │  or  │    └────────┘                │
//! │       pushed content         │      │                              │
//! └──────────────────────────────┘      └──────────────────────────────┘
//! ```
//!
//! With pushed content the logo is pinned at the top and the content is drawn
//! below it. Without, the logo bounces around the whole panel.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::config::{LOGO_POS, LOGO_SIZE};
use crate::error::AssetError;
use crate::widgets::{self, BouncingImage, Sprite, StaticImage};

pub struct IdleScreen {
    logo: StaticImage,
    bounce: BouncingImage,
}

impl IdleScreen {
    /// `logo` must already be scaled to [`LOGO_SIZE`].
    pub fn new(logo: Sprite) -> Self {
        Self { bounce: BouncingImage::new(logo.clone()), logo: StaticImage::new(logo, LOGO_POS) }
    }

    /// Load and scale the logo image from disk.
    pub fn load(path: &std::path::Path) -> Result<Self, AssetError> {
        Ok(Self::new(Sprite::load_scaled(path, LOGO_SIZE)?))
    }

    /// Draw one frame: the pinned logo plus `pending`, or a bounce step.
    pub fn draw<D>(&mut self, target: &mut D, pending: Option<&mut widgets::Drawable>)
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match pending {
            Some(content) => {
                self.logo.render(target);
                content.render(target);
            }
            None => self.bounce.render(target),
        }
    }

    /// Restart the bounce from a fresh random position.
    pub fn reset_animation(&mut self) {
        self.bounce.reset();
    }

    /// Top-left corner of the bouncing logo after the last frame.
    pub const fn bounce_position(&self) -> Point {
        self.bounce.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics_simulator::SimulatorDisplay;

    use crate::colors::{BLACK, RED};
    use crate::config::SCREEN_SIZE;
    use crate::widgets::StaticText;

    fn idle() -> IdleScreen {
        IdleScreen::new(Sprite::solid(LOGO_SIZE, RED))
    }

    #[test]
    fn test_pending_content_pins_logo() {
        let mut screen = idle();
        let mut display = SimulatorDisplay::<Rgb565>::new(SCREEN_SIZE);
        let mut content = widgets::Drawable::from(StaticText::new("hi"));
        screen.draw(&mut display, Some(&mut content));

        assert_eq!(display.get_pixel(LOGO_POS), RED, "Logo top-left");
        assert_eq!(display.get_pixel(LOGO_POS + Point::new(LOGO_SIZE.width as i32 - 1, 0)), RED);
        assert_eq!(display.get_pixel(LOGO_POS - Point::new(1, 0)), BLACK);
    }

    #[test]
    fn test_no_content_bounces() {
        let mut screen = idle();
        let mut display = SimulatorDisplay::<Rgb565>::new(SCREEN_SIZE);
        screen.draw(&mut display, None);
        let position = screen.bounce_position();
        assert_eq!(display.get_pixel(position), RED, "Logo drawn at the bounce position");

        let before = screen.bounce_position();
        screen.draw(&mut display, None);
        assert_ne!(screen.bounce_position(), before, "Each frame moves the logo");
    }

    #[test]
    fn test_reset_keeps_logo_in_bounds() {
        let mut screen = idle();
        for _ in 0..50 {
            screen.reset_animation();
            let p = screen.bounce_position();
            assert!((0..=(SCREEN_SIZE.width - LOGO_SIZE.width) as i32).contains(&p.x));
            assert!((0..=(SCREEN_SIZE.height - LOGO_SIZE.height) as i32).contains(&p.y));
        }
    }
}
