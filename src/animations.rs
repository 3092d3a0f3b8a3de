//! Motion math for animated drawables.
//!
//! - **Tween**: frame-counted linear interpolation between a start and an end
//!   state, used by the interpolated image.
//! - **Bounce**: screen-saver style motion that reflects off the panel edges,
//!   used by the idle logo.
//!
//! Both advance by exactly one step per rendered frame; neither knows about
//! wall-clock time.

use embedded_graphics::prelude::{Point, Size};
use rand::Rng;

// =============================================================================
// Interpolation
// =============================================================================

/// Linear interpolation between `a` and `b` at fraction `t`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (b - a).mul_add(t, a)
}

/// Interpolate both coordinates, truncating toward zero.
pub fn lerp_point(a: Point, b: Point, t: f32) -> Point {
    Point::new(
        lerp(a.x as f32, b.x as f32, t) as i32,
        lerp(a.y as f32, b.y as f32, t) as i32,
    )
}

/// Interpolate both dimensions, truncating toward zero.
pub fn lerp_size(a: Size, b: Size, t: f32) -> Size {
    Size::new(
        lerp(a.width as f32, b.width as f32, t) as u32,
        lerp(a.height as f32, b.height as f32, t) as u32,
    )
}

/// Phase of a fixed-length interpolation.
///
/// Progress is derived from a frame counter rather than accumulated, so it
/// lands on exactly 1.0 after `duration` advances and stays there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tween {
    frame: u32,
    duration: u32,
}

impl Tween {
    /// A tween that completes after `duration` frames. Zero means already finished.
    pub const fn new(duration: u32) -> Self {
        Self { frame: 0, duration }
    }

    /// Current fraction in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.frame >= self.duration {
            1.0
        } else {
            self.frame as f32 / self.duration as f32
        }
    }

    /// Move one frame forward, saturating at the end.
    pub const fn advance(&mut self) {
        if self.frame < self.duration {
            self.frame += 1;
        }
    }

    #[inline]
    pub const fn is_finished(&self) -> bool {
        self.frame >= self.duration
    }
}

// =============================================================================
// Bounce
// =============================================================================

/// Top-left position and velocity of an object bouncing inside a rectangle.
///
/// The position always stays within `[0, limit]` on both axes, where `limit`
/// is the container size minus the object size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounce {
    position: Point,
    velocity: Point,
    limit: Point,
}

impl Bounce {
    /// Object of size `object` moving `speed` pixels per frame on each axis
    /// inside `container`. Starts at the origin; call [`Bounce::reset`] to
    /// randomize.
    pub fn new(container: Size, object: Size, speed: i32) -> Self {
        Self {
            position: Point::zero(),
            velocity: Point::new(speed, speed),
            limit: Point::new(
                container.width.saturating_sub(object.width) as i32,
                container.height.saturating_sub(object.height) as i32,
            ),
        }
    }

    /// Place the object uniformly at random within the valid range.
    /// Velocity keeps its current direction.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.position = Point::new(rng.gen_range(0..=self.limit.x), rng.gen_range(0..=self.limit.y));
    }

    /// Advance one frame and return the new position.
    pub fn step(&mut self) -> Point {
        step_axis(&mut self.position.x, &mut self.velocity.x, self.limit.x);
        step_axis(&mut self.position.y, &mut self.velocity.y, self.limit.y);
        self.position
    }

    #[inline]
    pub const fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub const fn velocity(&self) -> Point {
        self.velocity
    }

    /// Largest valid top-left coordinate on each axis.
    #[inline]
    pub const fn limit(&self) -> Point {
        self.limit
    }
}

/// Reflect when the next move would leave `[0, limit]`, then move.
fn step_axis(position: &mut i32, velocity: &mut i32, limit: i32) {
    let next = *position + *velocity;
    if next < 0 || next > limit {
        *velocity = -*velocity;
    }
    *position = (*position + *velocity).clamp(0, limit);
}

// =============================================================================
// Unit Tests
// =============================================================================
