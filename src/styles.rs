//! Text faces for the panel.
//!
//! Drawing code asks for text by nominal pixel size (the size clients and the
//! layout constants speak in). ProFont only ships up to 24 point, so sizes
//! above the largest glyph height are rendered with the 24 point font and an
//! integer pixel scale.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use profont::{PROFONT_9_POINT, PROFONT_12_POINT, PROFONT_14_POINT, PROFONT_18_POINT, PROFONT_24_POINT};

/// Largest font available; base for scaled text.
pub const LARGE_FONT: &MonoFont<'static> = &PROFONT_24_POINT;

/// Smaller fonts in ascending glyph height, used unscaled.
const SMALL_FONTS: [&MonoFont<'static>; 4] = [&PROFONT_9_POINT, &PROFONT_12_POINT, &PROFONT_14_POINT, &PROFONT_18_POINT];

/// A font plus the integer factor each glyph pixel is magnified by.
#[derive(Clone, Copy)]
pub struct TextFace {
    pub font: &'static MonoFont<'static>,
    pub scale: u32,
}

impl TextFace {
    /// Pick the face whose rendered glyph height is closest to `size` pixels.
    pub fn for_size(size: u32) -> Self {
        let large_height = LARGE_FONT.character_size.height;
        if size >= large_height {
            let scale = (size + large_height / 2) / large_height;
            return Self { font: LARGE_FONT, scale: scale.max(1) };
        }

        let font = SMALL_FONTS
            .iter()
            .rev()
            .copied()
            .find(|font| font.character_size.height <= size)
            .unwrap_or(SMALL_FONTS[0]);
        Self { font, scale: 1 }
    }

    /// Character style in the given color.
    pub const fn style(&self, color: Rgb565) -> MonoTextStyle<'static, Rgb565> {
        MonoTextStyle::new(self.font, color)
    }

    /// Height of one rendered line in panel pixels.
    pub const fn line_height(&self) -> u32 {
        self.font.character_size.height * self.scale
    }
}

impl std::fmt::Debug for TextFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextFace")
            .field("glyph", &self.font.character_size)
            .field("scale", &self.scale)
            .finish()
    }
}
