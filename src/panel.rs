//! Display panel backends.
//!
//! All drawing goes to an in-memory Rgb565 frame ([`SimulatorDisplay`] with
//! the SDL window disabled), so the widgets never touch hardware. On
//! [`Panel::flip`] the finished frame is handed to a [`FrameSink`]:
//!
//! | Sink | Output |
//! |------|--------|
//! | [`Headless`] | Nothing; the frame stays inspectable in memory |
//! | [`Framebuffer`] | Raw little-endian RGB565 rows written to a Linux fbdev device |
//! | `PreviewWindow` | SDL desktop window (requires the `window` feature) |
//!
//! The frame is never cleared implicitly; the render loop clears it at the
//! start of every tick.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::SimulatorDisplay;
use tracing::info;

use crate::config::SCREEN_SIZE;
use crate::error::PanelError;

/// A drawable surface that can push its contents to the physical panel.
pub trait Panel: DrawTarget<Color = Rgb565> {
    /// Show everything drawn since the previous flip.
    fn flip(&mut self) -> Result<(), PanelError>;
}

/// Destination for finished frames.
pub trait FrameSink {
    fn present(&mut self, frame: &SimulatorDisplay<Rgb565>) -> Result<(), PanelError>;
}

// =============================================================================
// Buffered Panel
// =============================================================================

/// Panel-sized in-memory frame presented to a sink on every flip.
pub struct BufferedPanel<S> {
    frame: SimulatorDisplay<Rgb565>,
    sink: S,
    frames_presented: u64,
}

/// Panel with no physical output.
pub type HeadlessPanel = BufferedPanel<Headless>;

impl<S: FrameSink> BufferedPanel<S> {
    pub fn new(sink: S) -> Self {
        Self { frame: SimulatorDisplay::new(SCREEN_SIZE), sink, frames_presented: 0 }
    }

    /// The frame as last drawn.
    pub const fn frame(&self) -> &SimulatorDisplay<Rgb565> {
        &self.frame
    }

    /// Color of one pixel in the current frame.
    pub fn pixel(&self, point: Point) -> Rgb565 {
        self.frame.get_pixel(point)
    }

    /// Number of successful flips.
    pub const fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl HeadlessPanel {
    pub fn headless() -> Self {
        Self::new(Headless)
    }
}

impl<S> OriginDimensions for BufferedPanel<S> {
    fn size(&self) -> Size {
        self.frame.size()
    }
}

impl<S> DrawTarget for BufferedPanel<S> {
    type Color = Rgb565;
    type Error = <SimulatorDisplay<Rgb565> as DrawTarget>::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.frame.draw_iter(pixels)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.frame.fill_solid(area, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.frame.clear(color)
    }
}

impl<S: FrameSink> Panel for BufferedPanel<S> {
    fn flip(&mut self) -> Result<(), PanelError> {
        self.sink.present(&self.frame)?;
        self.frames_presented += 1;
        Ok(())
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Discards frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct Headless;

impl FrameSink for Headless {
    fn present(&mut self, _frame: &SimulatorDisplay<Rgb565>) -> Result<(), PanelError> {
        Ok(())
    }
}

/// Linux framebuffer device expecting 16 bpp RGB565.
#[derive(Debug)]
pub struct Framebuffer {
    file: File,
    path: PathBuf,
    scratch: Vec<u8>,
}

impl Framebuffer {
    pub fn open(path: &Path) -> Result<Self, PanelError> {
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|source| PanelError::Open { path: path.to_path_buf(), source })?;
        info!(device = %path.display(), "Opened framebuffer");
        let scratch = Vec::with_capacity((SCREEN_SIZE.width * SCREEN_SIZE.height * 2) as usize);
        Ok(Self { file, path: path.to_path_buf(), scratch })
    }
}

impl FrameSink for Framebuffer {
    fn present(&mut self, frame: &SimulatorDisplay<Rgb565>) -> Result<(), PanelError> {
        self.scratch.clear();
        for point in frame.bounding_box().points() {
            let raw: u16 = frame.get_pixel(point).into_storage();
            self.scratch.extend_from_slice(&raw.to_le_bytes());
        }
        self.file
            .write_all_at(&self.scratch, 0)
            .map_err(|source| PanelError::Write { path: self.path.clone(), source })
    }
}

/// Desktop preview window for development.
#[cfg(feature = "window")]
pub struct PreviewWindow {
    window: embedded_graphics_simulator::Window,
}

#[cfg(feature = "window")]
impl PreviewWindow {
    pub fn new(title: &str) -> Self {
        let settings = embedded_graphics_simulator::OutputSettingsBuilder::new().build();
        Self { window: embedded_graphics_simulator::Window::new(title, &settings) }
    }
}

#[cfg(feature = "window")]
impl FrameSink for PreviewWindow {
    fn present(&mut self, frame: &SimulatorDisplay<Rgb565>) -> Result<(), PanelError> {
        self.window.update(frame);
        if self
            .window
            .events()
            .any(|event| matches!(event, embedded_graphics_simulator::SimulatorEvent::Quit))
        {
            return Err(PanelError::WindowClosed);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
