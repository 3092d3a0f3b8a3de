//! Image drawables.
//!
//! Images are decoded once with the `image` crate and kept as an owned Rgb565
//! [`Sprite`]. Transparent pixels are flattened against the black panel
//! background at load time, so sprites are always drawn opaque.
//!
//! - [`StaticImage`]: pre-scaled sprite at a fixed position
//! - [`InterpolatedImage`]: position and size move from a start to an end
//!   pair over a fixed number of frames
//! - [`BouncingImage`]: pre-scaled sprite bouncing off the panel edges

use std::fmt;
use std::path::Path;

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::animations::{Bounce, Tween, lerp_point, lerp_size};
use crate::config::{BOUNCE_SPEED, SCREEN_SIZE};
use crate::error::AssetError;

// =============================================================================
// Sprite
// =============================================================================

/// Owned Rgb565 pixel buffer in row-major order.
#[derive(Clone, PartialEq, Eq)]
pub struct Sprite {
    size: Size,
    pixels: Vec<Rgb565>,
}

impl Sprite {
    /// Build a sprite from raw pixels. `pixels` must hold `width * height` entries.
    pub fn from_pixels(size: Size, pixels: Vec<Rgb565>) -> Self {
        debug_assert_eq!(pixels.len(), (size.width * size.height) as usize);
        Self { size, pixels }
    }

    /// Single-color sprite.
    pub fn solid(size: Size, color: Rgb565) -> Self {
        Self::from_pixels(size, vec![color; (size.width * size.height) as usize])
    }

    /// Decode an image file and resample it to `size`.
    pub fn load_scaled(path: &Path, size: Size) -> Result<Self, AssetError> {
        let image = open_rgba(path)?;
        let resized = imageops::resize(&image, size.width, size.height, FilterType::Triangle);
        Ok(Self::from_rgba(&resized))
    }

    /// Convert RGBA pixels, blending alpha against black.
    pub fn from_rgba(image: &RgbaImage) -> Self {
        let pixels = image
            .pixels()
            .map(|px| {
                let [r, g, b, a] = px.0;
                let blend = |channel: u8| (u16::from(channel) * u16::from(a) / 255) as u8;
                Rgb565::from(Rgb888::new(blend(r), blend(g), blend(b)))
            })
            .collect::<Vec<_>>();
        Self::from_pixels(Size::new(image.width(), image.height()), pixels)
    }

    #[inline]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Color at `(x, y)` within the sprite.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels.get((y * self.size.width + x) as usize).copied()
    }

    /// Copy the sprite at its own size with its top-left corner at `top_left`.
    pub fn blit<D: DrawTarget<Color = Rgb565>>(&self, target: &mut D, top_left: Point) {
        target
            .fill_contiguous(&Rectangle::new(top_left, self.size), self.pixels.iter().copied())
            .ok();
    }

    /// Draw the sprite resampled to `size` (nearest neighbor).
    pub fn blit_scaled<D: DrawTarget<Color = Rgb565>>(&self, target: &mut D, top_left: Point, size: Size) {
        if size == self.size {
            self.blit(target, top_left);
            return;
        }
        if size.width == 0 || size.height == 0 || self.size.width == 0 || self.size.height == 0 {
            return;
        }
        let (src_w, src_h) = (u64::from(self.size.width), u64::from(self.size.height));
        let (dst_w, dst_h) = (u64::from(size.width), u64::from(size.height));
        let colors = (0..dst_h).flat_map(move |y| {
            let sy = y * src_h / dst_h;
            (0..dst_w).map(move |x| {
                let sx = x * src_w / dst_w;
                self.pixels[(sy * src_w + sx) as usize]
            })
        });
        target.fill_contiguous(&Rectangle::new(top_left, size), colors).ok();
    }
}

impl fmt::Debug for Sprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sprite").field("size", &self.size).finish_non_exhaustive()
    }
}

fn open_rgba(path: &Path) -> Result<RgbaImage, AssetError> {
    image::open(path)
        .map(|image| image.to_rgba8())
        .map_err(|source| AssetError { path: path.to_path_buf(), source })
}

// =============================================================================
// Static Image
// =============================================================================

/// A sprite drawn at a fixed position every frame.
#[derive(Clone, Debug)]
pub struct StaticImage {
    sprite: Sprite,
    position: Point,
}

impl StaticImage {
    /// `sprite` is expected to be scaled to its display size already.
    pub fn new(sprite: Sprite, position: Point) -> Self {
        Self { sprite, position }
    }

    pub fn render<D: DrawTarget<Color = Rgb565>>(&self, target: &mut D) {
        self.sprite.blit(target, self.position);
    }
}

// =============================================================================
// Interpolated Image
// =============================================================================

/// A sprite whose position and size move linearly over `duration` frames.
///
/// Each render draws the current state and then advances one frame. Once the
/// end state is reached it is drawn unchanged on every further call.
#[derive(Clone, Debug)]
pub struct InterpolatedImage {
    sprite: Sprite,
    start_position: Point,
    end_position: Point,
    start_size: Size,
    end_size: Size,
    tween: Tween,
}

impl InterpolatedImage {
    pub fn new(
        sprite: Sprite,
        (start_position, end_position): (Point, Point),
        (start_size, end_size): (Size, Size),
        duration: u32,
    ) -> Self {
        Self { sprite, start_position, end_position, start_size, end_size, tween: Tween::new(duration) }
    }

    /// Interpolation fraction in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.tween.progress()
    }

    /// Top-left corner the next render will use.
    pub fn position(&self) -> Point {
        lerp_point(self.start_position, self.end_position, self.tween.progress())
    }

    /// Size the next render will use.
    pub fn size(&self) -> Size {
        lerp_size(self.start_size, self.end_size, self.tween.progress())
    }

    pub fn render<D: DrawTarget<Color = Rgb565>>(&mut self, target: &mut D) {
        self.sprite.blit_scaled(target, self.position(), self.size());
        self.tween.advance();
    }
}

// =============================================================================
// Bouncing Image
// =============================================================================

/// A sprite that travels diagonally and reflects off the panel edges.
#[derive(Clone, Debug)]
pub struct BouncingImage {
    sprite: Sprite,
    motion: Bounce,
}

impl BouncingImage {
    /// Bounce `sprite` around the whole panel at the default speed, starting
    /// from a random position.
    pub fn new(sprite: Sprite) -> Self {
        Self::with_speed(sprite, BOUNCE_SPEED)
    }

    pub fn with_speed(sprite: Sprite, speed: i32) -> Self {
        let motion = Bounce::new(SCREEN_SIZE, sprite.size(), speed);
        let mut image = Self { sprite, motion };
        image.reset();
        image
    }

    /// Jump to a uniformly random in-bounds position.
    pub fn reset(&mut self) {
        self.reset_with(&mut rand::thread_rng());
    }

    pub fn reset_with<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.motion.reset(rng);
    }

    #[inline]
    pub const fn position(&self) -> Point {
        self.motion.position()
    }

    /// Move one frame, then draw.
    pub fn render<D: DrawTarget<Color = Rgb565>>(&mut self, target: &mut D) {
        let position = self.motion.step();
        self.sprite.blit(target, position);
    }
}
