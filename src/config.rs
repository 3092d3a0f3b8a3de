//! Application configuration constants.
//!
//! Layout values are fixed for the 800x480 reference panel and computed at
//! compile time, so drawing code never recalculates positions per frame.
//! Runtime-tunable values (paths, GPU count, timing) have their defaults here
//! and can be overridden from the command line.

use std::time::Duration;

use embedded_graphics::prelude::{Point, Size};

// =============================================================================
// Display Configuration
// =============================================================================

/// Panel width in pixels.
pub const SCREEN_WIDTH: u32 = 800;

/// Panel height in pixels.
pub const SCREEN_HEIGHT: u32 = 480;

/// Full panel size.
pub const SCREEN_SIZE: Size = Size::new(SCREEN_WIDTH, SCREEN_HEIGHT);

/// Screen center X coordinate.
pub const CENTER_X: i32 = (SCREEN_WIDTH / 2) as i32;

/// Screen center Y coordinate. Gauges are vertically centered on this line.
pub const CENTER_Y: i32 = (SCREEN_HEIGHT / 2) as i32;

// =============================================================================
// Timing Configuration
// =============================================================================

/// Default frame period (~60 FPS). The render loop sleeps if a frame completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(16);

/// STATUS reverts to SLEEP after this long without activity.
pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(15);

/// Mean GPU utilization (percent) above which the machine counts as busy.
pub const ACTIVITY_THRESHOLD: f32 = 5.0;

/// Interval between frame statistics reports.
pub const STATS_INTERVAL: Duration = Duration::from_secs(30);

// =============================================================================
// Sensor Configuration
// =============================================================================

/// Number of GPUs in the reference deployment (cards 1..=6).
pub const GPU_COUNT: usize = 6;

/// `hwmon{card + offset}` holds the power readings for a card.
pub const HWMON_INDEX_OFFSET: usize = 4;

/// `power1_average` is reported in microwatts.
pub const POWER_DIVISOR: u64 = 1_000_000;

/// Upper bound of a utilization reading, used as the gauge maximum.
pub const UTILIZATION_MAX: u32 = 100;

// =============================================================================
// Default Paths
// =============================================================================

/// Control socket location.
pub const SOCKET_PATH: &str = "/run/tinybox-screen.sock";

/// Logo shown on the idle screen.
pub const LOGO_PATH: &str = "/opt/tinybox/screen/logo.png";

/// Root of the sysfs mount.
pub const SYSFS_ROOT: &str = "/sys";

/// Framebuffer device the panel is attached to.
pub const FRAMEBUFFER_DEVICE: &str = "/dev/fb0";

/// Longest accepted command line in bytes, newline included.
pub const MAX_COMMAND_BYTES: u64 = 4096;

/// How long a connected client may take to send its command line.
pub const COMMAND_READ_TIMEOUT: Duration = Duration::from_secs(5);

// =============================================================================
// Idle Screen Layout
// =============================================================================

/// Top-left corner of the static logo shown above pushed text.
pub const LOGO_POS: Point = Point::new(200, 25);

/// Logo size after scaling (both the static and the bouncing logo).
pub const LOGO_SIZE: Size = Size::new(400, 240);

/// Pixels per frame the bouncing logo travels on each axis.
pub const BOUNCE_SPEED: i32 = 2;

/// Nominal size of pushed text.
pub const TEXT_SIZE: u32 = 100;

/// Vertical distance between the centers of consecutive text lines.
pub const LINE_PITCH: i32 = 80;

/// Vertical midpoint of the text area below the logo.
pub const TEXT_CENTER_Y: i32 = 345;

// =============================================================================
// Status Screen Layout
// =============================================================================

/// Width of each utilization gauge.
pub const GAUGE_WIDTH: u32 = 50;

/// Full height of each utilization gauge.
pub const GAUGE_HEIGHT: u32 = 380;

/// Center X of the first gauge.
pub const GAUGE_FIRST_X: i32 = 50;

/// Horizontal distance between gauge centers.
pub const GAUGE_SPACING: i32 = 75;

/// Center of the total power readout.
pub const POWER_TEXT_POS: Point = Point::new(625, CENTER_Y);

/// Nominal size of the total power readout.
pub const POWER_TEXT_SIZE: u32 = 100;
