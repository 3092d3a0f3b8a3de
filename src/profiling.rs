//! Frame timing statistics for the render loop.
//!
//! Tracks render time, frame-budget overruns and frame rate over a fixed
//! reporting window. The render loop records every frame and logs a
//! [`FrameReport`] at `debug` each time a window closes.
//!
//! # Usage
//!
//! ```ignore
//! let mut stats = FrameStats::new(STATS_INTERVAL, FRAME_TIME, Instant::now());
//!
//! // In the render loop:
//! let frame_start = Instant::now();
//! // ... tick ...
//! stats.record_frame(frame_start.elapsed());
//! if let Some(report) = stats.report(Instant::now()) {
//!     debug!(%report, "Frame statistics");
//! }
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use heapless::String;

// =============================================================================
// Frame Statistics
// =============================================================================

/// Accumulates frame timings for the current reporting window.
#[derive(Debug)]
pub struct FrameStats {
    window: Duration,
    budget: Duration,
    window_start: Instant,
    started: Instant,

    frames: u32,
    render_total: Duration,
    render_max: Duration,
    overruns: u32,
}

/// Summary of one closed reporting window.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    pub fps: f32,
    pub frames: u32,
    pub render_avg: Duration,
    pub render_max: Duration,
    /// Frames whose render time exceeded the frame period.
    pub overruns: u32,
    pub uptime: Duration,
}

impl FrameStats {
    /// Report every `window`, counting frames that take longer than `budget`
    /// as overruns.
    pub fn new(window: Duration, budget: Duration, now: Instant) -> Self {
        Self {
            window,
            budget,
            window_start: now,
            started: now,
            frames: 0,
            render_total: Duration::ZERO,
            render_max: Duration::ZERO,
            overruns: 0,
        }
    }

    /// Record the render time of one frame (before any pacing sleep).
    pub fn record_frame(&mut self, render_time: Duration) {
        self.frames += 1;
        self.render_total += render_time;
        self.render_max = self.render_max.max(render_time);
        if render_time > self.budget {
            self.overruns += 1;
        }
    }

    #[inline]
    pub const fn frames(&self) -> u32 {
        self.frames
    }

    /// Close the window and return its summary once `window` has elapsed.
    pub fn report(&mut self, now: Instant) -> Option<FrameReport> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }

        let report = FrameReport {
            fps: self.frames as f32 / elapsed.as_secs_f32(),
            frames: self.frames,
            render_avg: self.render_total.checked_div(self.frames).unwrap_or_default(),
            render_max: self.render_max,
            overruns: self.overruns,
            uptime: now.saturating_duration_since(self.started),
        };

        self.window_start = now;
        self.frames = 0;
        self.render_total = Duration::ZERO;
        self.render_max = Duration::ZERO;
        self.overruns = 0;
        Some(report)
    }
}

impl FrameReport {
    /// Uptime as `HH:MM:SS`.
    pub fn uptime_string(&self) -> String<16> {
        let secs = self.uptime.as_secs();
        let mut s = String::new();
        fmt::Write::write_fmt(&mut s, format_args!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60))
            .ok();
        s
    }
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} fps, render avg {}us max {}us, {} overruns, up {}",
            self.fps,
            self.render_avg.as_micros(),
            self.render_max.as_micros(),
            self.overruns,
            self.uptime_string()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
