//! The render loop: command intake, state transitions, drawing and pacing.
//!
//! One [`RenderLoop::tick`] per frame:
//!
//! 1. Take at most one command from the queue without blocking and apply it.
//! 2. If there was none: check the inactivity timeout, then read GPU
//!    utilization and let it enter or refresh Status.
//! 3. Clear the panel and draw the screen for the current state.
//! 4. Flip the frame to the panel.
//!
//! [`RenderLoop::run`] repeats this at a fixed frame period on the calling
//! thread until the shutdown flag is raised, then blanks the panel.
//!
//! # Failure Handling
//!
//! | Fault | Effect |
//! |-------|--------|
//! | Sensor read fails | Logged once per episode; the dashboard keeps its last values |
//! | Panel flip fails | Returned to the caller; the loop stops |

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use embedded_graphics::prelude::DrawTarget;
use tracing::{debug, info, trace};

use crate::colors::BLACK;
use crate::command::CommandReceiver;
use crate::config::{FRAME_TIME, STATS_INTERVAL};
use crate::error::PanelError;
use crate::panel::Panel;
use crate::profiling::FrameStats;
use crate::screens::{IdleScreen, StatusScreen};
use crate::sensors::{SensorHealth, SensorReader};
use crate::state::{ActivityPolicy, DisplayState, PanelState};

/// Timing knobs for the render loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    /// Target period of one frame.
    pub frame_time: Duration,
    pub policy: ActivityPolicy,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { frame_time: FRAME_TIME, policy: ActivityPolicy::default() }
    }
}

pub struct RenderLoop<P, S> {
    panel: P,
    sensors: S,
    commands: CommandReceiver,
    state: PanelState,
    idle: IdleScreen,
    status: StatusScreen,
    health: SensorHealth,
    frame_time: Duration,
}

impl<P: Panel, S: SensorReader> RenderLoop<P, S> {
    pub fn new(panel: P, sensors: S, commands: CommandReceiver, idle: IdleScreen, settings: RenderSettings) -> Self {
        Self {
            panel,
            sensors,
            commands,
            state: PanelState::new(Instant::now(), settings.policy),
            idle,
            status: StatusScreen::new(),
            health: SensorHealth::new(),
            frame_time: settings.frame_time,
        }
    }

    pub const fn state(&self) -> &PanelState {
        &self.state
    }

    pub const fn panel(&self) -> &P {
        &self.panel
    }

    pub const fn sensors(&self) -> &S {
        &self.sensors
    }

    /// Run one frame at time `now`.
    pub fn tick(&mut self, now: Instant) -> Result<(), PanelError> {
        // Sensors are read at most once per tick
        let mut polled = false;
        let mut utilizations = None;
        if let Ok(command) = self.commands.try_recv() {
            debug!(?command, "Applying command");
            self.state.apply(command, now);
        } else {
            if self.state.check_timeout(now) {
                self.idle.reset_animation();
            }
            utilizations = self.health.check(self.sensors.read_utilizations());
            polled = true;
            if let Some(values) = &utilizations {
                trace!(?values, "GPU utilization");
                self.state.observe_utilization(values, now);
            }
        }

        self.panel.clear(BLACK).ok();
        match self.state.display() {
            DisplayState::Sleep => self.idle.draw(&mut self.panel, self.state.pending_mut()),
            DisplayState::Status => {
                if !polled {
                    utilizations = self.health.check(self.sensors.read_utilizations());
                }
                let power_draws = if utilizations.is_some() {
                    self.health.check(self.sensors.read_power_draws())
                } else {
                    None
                };
                self.status.update(utilizations, power_draws);
                self.status.draw(&mut self.panel);
            }
        }
        self.panel.flip()
    }

    /// Tick at the configured frame period until `shutdown` is set.
    ///
    /// The flag is checked once per frame. On a clean stop the panel is
    /// blanked before returning.
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<(), PanelError> {
        info!(frame_ms = self.frame_time.as_millis() as u64, "Render loop started");
        let mut stats = FrameStats::new(STATS_INTERVAL, self.frame_time, Instant::now());

        while !shutdown.load(Ordering::Relaxed) {
            let frame_start = Instant::now();
            self.tick(frame_start)?;

            stats.record_frame(frame_start.elapsed());
            if let Some(report) = stats.report(Instant::now()) {
                debug!(%report, "Frame statistics");
            }

            if let Some(remaining) = self.frame_time.checked_sub(frame_start.elapsed()) {
                thread::sleep(remaining);
            }
        }

        info!("Render loop stopping, blanking panel");
        self.panel.clear(BLACK).ok();
        self.panel.flip()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::sync::Arc;

    use embedded_graphics::prelude::Point;

    use crate::colors::{GAUGE_TRACK, RED, gauge_fill};
    use crate::command::{Command, CommandSender, decode, queue};
    use crate::config::{CENTER_Y, LOGO_POS, LOGO_SIZE};
    use crate::error::SensorError;
    use crate::panel::HeadlessPanel;
    use crate::widgets::{Drawable, Sprite};

    /// Sensors whose readings the test can change between ticks.
    /// `None` makes the next read fail.
    struct FakeSensors {
        utilizations: RefCell<Option<Vec<u32>>>,
        power_draws: RefCell<Option<Vec<u64>>>,
        reads: RefCell<u32>,
    }

    impl FakeSensors {
        fn idle() -> Self {
            Self {
                utilizations: RefCell::new(Some(vec![0; 6])),
                power_draws: RefCell::new(Some(vec![100; 6])),
                reads: RefCell::new(0),
            }
        }

        fn set_utilizations(&self, values: Option<Vec<u32>>) {
            *self.utilizations.borrow_mut() = values;
        }

        fn set_power_draws(&self, values: Option<Vec<u64>>) {
            *self.power_draws.borrow_mut() = values;
        }
    }

    fn fault() -> SensorError {
        SensorError::MissingHwmon(PathBuf::from("/sys/class/drm/card1/device/hwmon"))
    }

    impl SensorReader for FakeSensors {
        fn read_utilizations(&self) -> Result<Vec<u32>, SensorError> {
            *self.reads.borrow_mut() += 1;
            self.utilizations.borrow().clone().ok_or_else(fault)
        }

        fn read_power_draws(&self) -> Result<Vec<u64>, SensorError> {
            self.power_draws.borrow().clone().ok_or_else(fault)
        }
    }

    type TestLoop = RenderLoop<HeadlessPanel, FakeSensors>;

    fn render_loop() -> (TestLoop, CommandSender) {
        let (tx, rx) = queue();
        let idle = IdleScreen::new(Sprite::solid(LOGO_SIZE, RED));
        let render = RenderLoop::new(HeadlessPanel::headless(), FakeSensors::idle(), rx, idle, RenderSettings::default());
        (render, tx)
    }

    fn send(tx: &CommandSender, line: &str) {
        tx.send(decode(line).expect("valid command")).expect("loop alive");
    }

    fn secs(start: Instant, s: u64) -> Instant {
        start + Duration::from_secs(s)
    }

    #[test]
    fn test_one_command_per_tick() {
        let (mut render, tx) = render_loop();
        let start = Instant::now();
        send(&tx, "status");
        send(&tx, "text,hi");

        render.tick(start).expect("tick");
        assert_eq!(render.state().display(), DisplayState::Status);
        render.tick(start).expect("tick");
        assert_eq!(render.state().display(), DisplayState::Sleep);
        assert_eq!(render.panel().frames_presented(), 2, "Every tick flips, command or not");
    }

    #[test]
    fn test_command_ticks_skip_sensor_poll() {
        let (mut render, tx) = render_loop();
        let start = Instant::now();
        send(&tx, "text,hi");
        render.tick(start).expect("tick");
        assert_eq!(*render.sensors().reads.borrow(), 0, "Sleep command tick reads no sensors");
        render.tick(start).expect("tick");
        assert_eq!(*render.sensors().reads.borrow(), 1);
    }

    #[test]
    fn test_failed_poll_is_not_retried_in_same_tick() {
        let (mut render, tx) = render_loop();
        let start = Instant::now();
        send(&tx, "status");
        render.tick(start).expect("tick");
        assert_eq!(*render.sensors().reads.borrow(), 1, "Status command tick reads once for drawing");

        render.sensors().set_utilizations(None);
        render.tick(secs(start, 1)).expect("tick");
        assert_eq!(*render.sensors().reads.borrow(), 2, "A failed poll is not repeated for drawing");
        assert_eq!(render.health.failures(), 1, "One failure counted per tick");

        render.tick(secs(start, 2)).expect("tick");
        assert_eq!(*render.sensors().reads.borrow(), 3);
        assert_eq!(render.health.failures(), 2);
    }

    #[test]
    fn test_last_command_decides_state() {
        let sequences: [(&[&str], DisplayState); 4] = [
            (&["text,a", "status"], DisplayState::Status),
            (&["status", "atext,a,b"], DisplayState::Sleep),
            (&["status", "bogus", "status"], DisplayState::Status),
            (&["atext,x", "status", "text,a,b"], DisplayState::Sleep),
        ];
        for (lines, expected) in sequences {
            let (mut render, tx) = render_loop();
            let start = Instant::now();
            for (i, line) in lines.iter().enumerate() {
                if let Some(command) = decode(line) {
                    tx.send(command).expect("loop alive");
                }
                // Interleave idle ticks that poll sensors
                render.tick(secs(start, i as u64)).expect("tick");
                render.tick(secs(start, i as u64)).expect("tick");
            }
            assert_eq!(render.state().display(), expected, "After {lines:?}");
        }
    }

    #[test]
    fn test_busy_gpus_enter_status() {
        let (mut render, _tx) = render_loop();
        let start = Instant::now();
        render.tick(start).expect("tick");
        assert_eq!(render.state().display(), DisplayState::Sleep);

        render.sensors().set_utilizations(Some(vec![0, 0, 0, 0, 0, 40]));
        let busy_at = secs(start, 1);
        render.tick(busy_at).expect("tick");
        assert_eq!(render.state().display(), DisplayState::Status);
        assert_eq!(render.state().last_active(), busy_at);
    }

    #[test]
    fn test_status_times_out_to_idle() {
        let (mut render, tx) = render_loop();
        let start = Instant::now();
        send(&tx, "status");
        render.tick(start).expect("tick");

        render.tick(secs(start, 15)).expect("tick");
        assert_eq!(render.state().display(), DisplayState::Status, "Exactly 15s is not a timeout");

        render.tick(secs(start, 16)).expect("tick");
        assert_eq!(render.state().display(), DisplayState::Sleep);
        assert!(render.state().pending().is_none());
    }

    #[test]
    fn test_busy_keeps_status_alive() {
        let (mut render, tx) = render_loop();
        let start = Instant::now();
        send(&tx, "status");
        render.tick(start).expect("tick");

        render.sensors().set_utilizations(Some(vec![20; 6]));
        for s in 1..=120 {
            render.tick(secs(start, s)).expect("tick");
        }
        assert_eq!(render.state().display(), DisplayState::Status);
        assert_eq!(render.state().last_active(), secs(start, 120));
    }

    #[test]
    fn test_sensor_failure_is_absorbed() {
        let (mut render, tx) = render_loop();
        let start = Instant::now();
        render.sensors().set_utilizations(None);
        render.sensors().set_power_draws(None);

        render.tick(start).expect("tick despite sensor failure");
        send(&tx, "status");
        render.tick(start).expect("tick");
        render.tick(secs(start, 1)).expect("tick");
        assert_eq!(render.state().display(), DisplayState::Status);
        assert_eq!(render.panel().frames_presented(), 3);
    }

    #[test]
    fn test_status_keeps_last_good_values() {
        let (mut render, tx) = render_loop();
        let start = Instant::now();
        let gauge_center = Point::new(StatusScreen::gauge_x(0), CENTER_Y);
        send(&tx, "status");
        render.sensors().set_utilizations(Some(vec![3, 0, 0, 0, 0, 0]));
        render.tick(start).expect("tick");
        assert_eq!(render.panel().pixel(gauge_center), gauge_fill(3, 100));

        render.sensors().set_utilizations(None);
        render.tick(secs(start, 1)).expect("tick");
        assert_eq!(render.panel().pixel(gauge_center), gauge_fill(3, 100), "Previous reading redrawn");

        render.sensors().set_utilizations(Some(vec![0; 6]));
        render.tick(secs(start, 2)).expect("tick");
        assert_eq!(render.panel().pixel(gauge_center), GAUGE_TRACK);
    }

    #[test]
    fn test_sleep_with_text_draws_pinned_logo() {
        let (mut render, tx) = render_loop();
        send(&tx, "text,hello,world");
        render.tick(Instant::now()).expect("tick");

        assert!(matches!(render.state().pending(), Some(Drawable::StaticText(_))));
        assert_eq!(render.panel().pixel(LOGO_POS), RED);
        assert_eq!(render.panel().pixel(LOGO_POS + Point::new(LOGO_SIZE.width as i32 - 1, 0)), RED);
    }

    #[test]
    fn test_status_command_reaches_queue_consumer() {
        let (mut render, tx) = render_loop();
        tx.send(Command::ShowStatus).expect("loop alive");
        render.tick(Instant::now()).expect("tick");
        assert_eq!(render.state().display(), DisplayState::Status);
    }

    #[test]
    fn test_run_stops_and_blanks() {
        let (mut render, tx) = render_loop();
        send(&tx, "text,bye");
        let shutdown = Arc::new(AtomicBool::new(false));

        let stopper = {
            let shutdown = Arc::clone(&shutdown);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(100));
                shutdown.store(true, Ordering::Relaxed);
            })
        };
        render.run(&shutdown).expect("run");
        stopper.join().expect("stopper thread");

        assert!(render.panel().frames_presented() >= 2, "At least one frame plus the blank frame");
        assert_eq!(render.panel().pixel(LOGO_POS), BLACK, "Panel is blanked on shutdown");
    }

    #[test]
    fn test_run_with_flag_already_set() {
        let (mut render, _tx) = render_loop();
        render.run(&AtomicBool::new(true)).expect("run");
        assert_eq!(render.panel().frames_presented(), 1, "Only the blank frame");
    }
}
