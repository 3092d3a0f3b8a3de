//! Color constants for the status panel.
//!
//! Rgb565 uses 16 bits per pixel (5 bits red, 6 bits green, 5 bits blue), the
//! native format of the framebuffer the panel is driven through. Colors are
//! specified in 8-bit-per-channel terms where that reads better and converted
//! once.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};

/// Pure black. Panel background.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Text color.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red. Gauge fill at full utilization.
pub const RED: Rgb565 = Rgb565::RED;

/// Gauge track behind the bar, (20, 20, 20) in 8-bit terms.
pub const GAUGE_TRACK: Rgb565 = Rgb565::new(20 >> 3, 20 >> 2, 20 >> 3);

/// Gauge fill for `value` out of `max`.
///
/// Red stays saturated while green and blue fade from 255 at zero to 0 at
/// `max`, so an idle gauge is white and a saturated one is pure red.
pub fn gauge_fill(value: u32, max: u32) -> Rgb565 {
    if max == 0 {
        return WHITE;
    }
    let fade = fade_level(value, max);
    Rgb888::new(255, fade, fade).into()
}

/// 8-bit green/blue level for `value` out of a non-zero `max`, truncated
/// towards zero.
fn fade_level(value: u32, max: u32) -> u8 {
    let remaining = max - value.min(max);
    (u64::from(remaining) * 255 / u64::from(max)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::IntoStorage;

    #[test]
    fn test_gauge_fill_extremes() {
        assert_eq!(gauge_fill(0, 100), WHITE, "Empty gauge should be white");
        assert_eq!(gauge_fill(100, 100), RED, "Full gauge should be red");
    }

    #[test]
    fn test_fade_level_truncates_remaining_fraction() {
        assert_eq!(fade_level(0, 100), 255);
        assert_eq!(fade_level(1, 100), 252, "255 * 0.99 = 252.45 truncates to 252");
        assert_eq!(fade_level(50, 100), 127);
        assert_eq!(fade_level(99, 100), 2);
        assert_eq!(fade_level(100, 100), 0);
        assert_eq!(fade_level(150, 100), 0, "Values past max clamp to full");
    }

    #[test]
    fn test_gauge_fill_keeps_red_channel() {
        for value in 0..=100 {
            let raw = gauge_fill(value, 100).into_storage();
            assert_eq!((raw >> 11) & 0x1F, 0x1F, "Red channel must stay saturated at {value}");
        }
    }

    #[test]
    fn test_gauge_fill_fades_monotonically() {
        let mut previous = u16::MAX;
        for value in 0..=100 {
            let green = (gauge_fill(value, 100).into_storage() >> 5) & 0x3F;
            assert!(green <= previous, "Green must not increase with value ({value})");
            previous = green;
        }
    }

    #[test]
    fn test_gauge_track_is_dark_gray() {
        let raw = GAUGE_TRACK.into_storage();
        assert_eq!((raw >> 11) & 0x1F, 2);
        assert_eq!((raw >> 5) & 0x3F, 5);
        assert_eq!(raw & 0x1F, 2);
    }
}
