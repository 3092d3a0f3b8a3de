//! Live dashboard shown in the Status state.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ ▒▒ ▒▒ ▒▒ ▒▒ ▒▒ ▒▒                        │
//! │ ██ ▒▒ ██ ▒▒ ▒▒ ██                        │
//! │ ██ ██ ██ ▒▒ ██ ██         1234W          │
//! │ ██ ▒▒ ██ ▒▒ ▒▒ ██                        │
//! │ ▒▒ ▒▒ ▒▒ ▒▒ ▒▒ ▒▒                        │
//! └──────────────────────────────────────────┘
//! ```
//!
//! One utilization gauge per GPU from the left edge, and the summed power
//! draw on the right. When a sensor read fails the previous snapshot is kept
//! and drawn again; before the first good read nothing is drawn.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use heapless::String;

use crate::config::{
    GAUGE_FIRST_X,
    GAUGE_HEIGHT,
    GAUGE_SPACING,
    GAUGE_WIDTH,
    POWER_TEXT_POS,
    POWER_TEXT_SIZE,
    UTILIZATION_MAX,
};
use crate::widgets::{PositionedText, VerticalGauge};

/// One complete set of dashboard readings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dashboard {
    /// Busy percentage per GPU, in device order.
    pub utilizations: Vec<u32>,
    /// Sum of all GPU power draws in watts.
    pub total_power: u64,
}

impl Dashboard {
    pub fn new(utilizations: Vec<u32>, power_draws: &[u64]) -> Self {
        Self { utilizations, total_power: power_draws.iter().sum() }
    }

    /// Power readout text, e.g. `1234W`.
    pub fn power_label(&self) -> String<24> {
        let mut label = String::new();
        write!(label, "{}W", self.total_power).ok();
        label
    }
}

#[derive(Debug, Default)]
pub struct StatusScreen {
    snapshot: Option<Dashboard>,
}

impl StatusScreen {
    pub const fn new() -> Self {
        Self { snapshot: None }
    }

    /// Replace the snapshot if both readings are present.
    ///
    /// Returns `false` (keeping the previous snapshot) when either is missing.
    pub fn update(&mut self, utilizations: Option<Vec<u32>>, power_draws: Option<Vec<u64>>) -> bool {
        let (Some(utilizations), Some(power_draws)) = (utilizations, power_draws) else {
            return false;
        };
        self.snapshot = Some(Dashboard::new(utilizations, &power_draws));
        true
    }

    #[cfg(test)]
    pub(crate) const fn snapshot(&self) -> Option<&Dashboard> {
        self.snapshot.as_ref()
    }

    /// Center X of gauge `index`.
    pub const fn gauge_x(index: usize) -> i32 {
        GAUGE_FIRST_X + GAUGE_SPACING * index as i32
    }

    pub fn draw<D: DrawTarget<Color = Rgb565>>(&self, target: &mut D) {
        let Some(dashboard) = &self.snapshot else {
            return;
        };
        for (index, &utilization) in dashboard.utilizations.iter().enumerate() {
            VerticalGauge::new(utilization, UTILIZATION_MAX, GAUGE_WIDTH, GAUGE_HEIGHT, Self::gauge_x(index))
                .render(target);
        }
        PositionedText::new(dashboard.power_label().as_str(), POWER_TEXT_POS, POWER_TEXT_SIZE).render(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics_simulator::SimulatorDisplay;

    use crate::colors::{BLACK, GAUGE_TRACK, gauge_fill};
    use crate::config::{CENTER_Y, SCREEN_SIZE};

    fn panel() -> SimulatorDisplay<Rgb565> {
        SimulatorDisplay::new(SCREEN_SIZE)
    }

    #[test]
    fn test_power_is_summed() {
        let dashboard = Dashboard::new(vec![0; 6], &[100, 200, 300, 0, 0, 634]);
        assert_eq!(dashboard.total_power, 1234);
        assert_eq!(dashboard.power_label().as_str(), "1234W");
    }

    #[test]
    fn test_gauge_positions() {
        assert_eq!(StatusScreen::gauge_x(0), 50);
        assert_eq!(StatusScreen::gauge_x(5), 425);
    }

    #[test]
    fn test_failed_read_keeps_snapshot() {
        let mut screen = StatusScreen::new();
        assert!(screen.update(Some(vec![10; 6]), Some(vec![5; 6])));
        assert!(!screen.update(None, Some(vec![9; 6])));
        assert!(!screen.update(Some(vec![90; 6]), None));
        let snapshot = screen.snapshot().expect("first snapshot kept");
        assert_eq!(snapshot.utilizations, vec![10; 6]);
        assert_eq!(snapshot.total_power, 30);
    }

    #[test]
    fn test_nothing_drawn_before_first_read() {
        let mut display = panel();
        let mut screen = StatusScreen::new();
        screen.update(None, None);
        screen.draw(&mut display);
        assert!(display.bounding_box().points().all(|p| display.get_pixel(p) == BLACK));
    }

    #[test]
    fn test_draws_one_gauge_per_gpu() {
        let mut display = panel();
        let mut screen = StatusScreen::new();
        screen.update(Some(vec![0, 100, 50]), Some(vec![1, 2, 3]));
        screen.draw(&mut display);

        let center = |i| Point::new(StatusScreen::gauge_x(i), CENTER_Y);
        assert_eq!(display.get_pixel(center(0)), GAUGE_TRACK, "Idle GPU shows only the track");
        assert_eq!(display.get_pixel(center(1)), gauge_fill(100, 100));
        assert_eq!(display.get_pixel(center(2)), gauge_fill(50, 100));
        assert_eq!(display.get_pixel(center(3)), BLACK, "No fourth gauge");
    }

    #[test]
    fn test_draws_power_readout() {
        let mut display = panel();
        let mut screen = StatusScreen::new();
        screen.update(Some(vec![0]), Some(vec![42]));
        screen.draw(&mut display);

        let lit_right = (500..SCREEN_SIZE.width as i32)
            .flat_map(|x| (0..SCREEN_SIZE.height as i32).map(move |y| Point::new(x, y)))
            .any(|p| display.get_pixel(p) != BLACK);
        assert!(lit_right, "Power text should be drawn around its anchor");
    }
}
