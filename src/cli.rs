use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use status_panel::config::{
    ACTIVITY_THRESHOLD,
    FRAME_TIME,
    FRAMEBUFFER_DEVICE,
    GPU_COUNT,
    HWMON_INDEX_OFFSET,
    INACTIVITY_TIMEOUT,
    LOGO_PATH,
    SOCKET_PATH,
    SYSFS_ROOT,
};
use status_panel::render::RenderSettings;
use status_panel::sensors::{HwmonLayout, SysfsSensors};
use status_panel::state::ActivityPolicy;

/// Where frames are sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PanelKind {
    /// Linux framebuffer device (RGB565).
    Fbdev,
    /// No output; useful for dry runs.
    Headless,
    /// Desktop preview window (built with the `window` feature).
    Window,
}

/// Status panel controller: idle animation, live GPU dashboard and a local
/// control socket for pushing text.
#[derive(Parser, Clone, Debug)]
#[command(name = "status-panel", version, about)]
pub struct Args {
    /// Control socket path.
    #[arg(long, default_value = SOCKET_PATH)]
    pub socket: PathBuf,

    /// Logo image shown on the idle screen.
    #[arg(long, default_value = LOGO_PATH)]
    pub logo: PathBuf,

    /// Root of the sysfs mount.
    #[arg(long, default_value = SYSFS_ROOT)]
    pub sysfs_root: PathBuf,

    /// Number of GPUs (cards 1..=N).
    #[arg(long, default_value_t = GPU_COUNT)]
    pub gpus: usize,

    /// Power readings live in hwmon{card + offset}.
    #[arg(long, default_value_t = HWMON_INDEX_OFFSET)]
    pub hwmon_offset: usize,

    /// Find each card's hwmon directory instead of using a fixed offset.
    #[arg(long, conflicts_with = "hwmon_offset")]
    pub hwmon_discover: bool,

    /// Panel backend.
    #[arg(long, value_enum, default_value_t = PanelKind::Fbdev)]
    pub panel: PanelKind,

    /// Framebuffer device for the fbdev backend.
    #[arg(long, default_value = FRAMEBUFFER_DEVICE)]
    pub device: PathBuf,

    /// Frame period in milliseconds.
    #[arg(long, default_value_t = FRAME_TIME.as_millis() as u64, value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub frame_ms: u64,

    /// Seconds without activity before the dashboard returns to idle.
    #[arg(long, default_value_t = INACTIVITY_TIMEOUT.as_secs())]
    pub idle_timeout: u64,

    /// Mean GPU utilization (percent) above which the dashboard is shown.
    #[arg(long, default_value_t = ACTIVITY_THRESHOLD)]
    pub activity_threshold: f32,

    /// Log filter override (e.g. debug, status_panel=trace).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    pub fn sensors(&self) -> SysfsSensors {
        let layout = if self.hwmon_discover {
            HwmonLayout::Discover
        } else {
            HwmonLayout::Offset(self.hwmon_offset)
        };
        SysfsSensors::new(&self.sysfs_root, self.gpus, layout)
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            frame_time: Duration::from_millis(self.frame_ms),
            policy: ActivityPolicy {
                timeout: Duration::from_secs(self.idle_timeout),
                threshold: self.activity_threshold,
            },
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
