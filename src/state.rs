//! Display state machine.
//!
//! The panel is always in one of two states:
//!
//! | State | Shows |
//! |-------|-------|
//! | [`DisplayState::Sleep`] | Pushed content below the logo, or the bouncing logo if nothing was pushed |
//! | [`DisplayState::Status`] | Live per-GPU utilization gauges and total power |
//!
//! # Transitions
//!
//! | From | Trigger | To | Side effects |
//! |------|---------|----|--------------|
//! | any | `ShowText` command | Sleep | pending content replaced |
//! | any | `ShowStatus` command | Status | activity refreshed, pending cleared |
//! | Status | no command, idle for more than the timeout | Sleep | pending cleared, activity reset to now |
//! | any | no command, mean utilization above threshold | Status | activity refreshed, pending cleared |
//!
//! The utilization check runs on every tick without a command, including
//! while already in Status, so a busy machine keeps the dashboard up
//! indefinitely. The timeout is evaluated first, against the activity
//! timestamp as it was before this tick's sensor read.
//!
//! Time is always passed in by the caller, which keeps every transition
//! deterministic under test.
//!
//! # Invariants
//!
//! - Pending content is only held in Sleep.
//! - The activity timestamp never moves backwards.

use std::time::{Duration, Instant};

use tracing::info;

use crate::command::Command;
use crate::config::{ACTIVITY_THRESHOLD, INACTIVITY_TIMEOUT};
use crate::widgets::Drawable;

/// Top-level display mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayState {
    #[default]
    Sleep,
    Status,
}

/// Thresholds driving the automatic transitions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivityPolicy {
    /// Status falls back to Sleep after strictly more than this long without activity.
    pub timeout: Duration,
    /// Mean utilization (percent) strictly above which the machine counts as busy.
    pub threshold: f32,
}

impl Default for ActivityPolicy {
    fn default() -> Self {
        Self { timeout: INACTIVITY_TIMEOUT, threshold: ACTIVITY_THRESHOLD }
    }
}

/// Mean of the readings in percent. No readings means idle.
pub fn mean_utilization(utilizations: &[u32]) -> f32 {
    if utilizations.is_empty() {
        return 0.0;
    }
    let sum: u64 = utilizations.iter().map(|&u| u64::from(u)).sum();
    sum as f32 / utilizations.len() as f32
}

/// Display state, pushed content and activity tracking.
#[derive(Debug)]
pub struct PanelState {
    display: DisplayState,
    pending: Option<Drawable>,
    last_active: Instant,
    policy: ActivityPolicy,
}

impl PanelState {
    /// Start in Sleep with nothing pushed. `now` seeds the activity timestamp.
    pub fn new(now: Instant, policy: ActivityPolicy) -> Self {
        Self { display: DisplayState::Sleep, pending: None, last_active: now, policy }
    }

    #[inline]
    pub const fn display(&self) -> DisplayState {
        self.display
    }

    pub const fn pending(&self) -> Option<&Drawable> {
        self.pending.as_ref()
    }

    /// Mutable access for rendering; animated content advances as it is drawn.
    pub fn pending_mut(&mut self) -> Option<&mut Drawable> {
        self.pending.as_mut()
    }

    #[inline]
    pub const fn last_active(&self) -> Instant {
        self.last_active
    }

    pub const fn policy(&self) -> &ActivityPolicy {
        &self.policy
    }

    /// Apply a command received this tick.
    pub fn apply(&mut self, command: Command, now: Instant) {
        match command {
            Command::ShowText(content) => {
                self.enter(DisplayState::Sleep, "text pushed");
                self.pending = Some(content);
            }
            Command::ShowStatus => {
                self.enter(DisplayState::Status, "status requested");
                self.mark_active(now);
            }
        }
    }

    /// Fall back to Sleep if Status has been idle for longer than the timeout.
    ///
    /// Returns `true` if the state changed, in which case the idle animation
    /// should be restarted.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        if self.display != DisplayState::Status {
            return false;
        }
        if now.saturating_duration_since(self.last_active) <= self.policy.timeout {
            return false;
        }
        self.enter(DisplayState::Sleep, "inactivity timeout");
        self.pending = None;
        self.touch(now);
        true
    }

    /// Enter or stay in Status if the machine is busy.
    ///
    /// Returns `true` if the mean utilization exceeded the threshold.
    pub fn observe_utilization(&mut self, utilizations: &[u32], now: Instant) -> bool {
        if mean_utilization(utilizations) <= self.policy.threshold {
            return false;
        }
        self.enter(DisplayState::Status, "gpu activity");
        self.mark_active(now);
        true
    }

    fn mark_active(&mut self, now: Instant) {
        self.pending = None;
        self.touch(now);
    }

    fn touch(&mut self, now: Instant) {
        self.last_active = self.last_active.max(now);
    }

    fn enter(&mut self, next: DisplayState, reason: &'static str) {
        if self.display != next {
            info!(from = ?self.display, to = ?next, reason, "Display state changed");
            self.display = next;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
