//! GPU sensor polling.
//!
//! The render loop only sees the [`SensorReader`] trait; [`SysfsSensors`] is the
//! production implementation backed by the amdgpu sysfs interface:
//!
//! | Reading | File | Units |
//! |---------|------|-------|
//! | Utilization | `class/drm/card{i}/device/gpu_busy_percent` | percent |
//! | Power | `class/drm/card{i}/device/hwmon/hwmon{j}/power1_average` | microwatts |
//!
//! Cards are numbered `1..=N`. Power readings are divided by
//! [`POWER_DIVISOR`] (integer division) to yield whole watts.
//!
//! A read is all-or-nothing: the first missing or malformed file fails the
//! whole call. No default value is ever substituted for a failed device.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{GPU_COUNT, HWMON_INDEX_OFFSET, POWER_DIVISOR, SYSFS_ROOT};
use crate::error::SensorError;

/// Source of per-GPU readings, one value per device in device order.
pub trait SensorReader {
    /// Busy percentage of every GPU.
    fn read_utilizations(&self) -> Result<Vec<u32>, SensorError>;

    /// Power draw of every GPU in watts.
    fn read_power_draws(&self) -> Result<Vec<u64>, SensorError>;
}

/// How the hwmon directory holding a card's power reading is located.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HwmonLayout {
    /// `hwmon{card + offset}`, fixed per deployment.
    Offset(usize),
    /// First `hwmon*` entry found under the card's `device/hwmon` directory.
    Discover,
}

impl Default for HwmonLayout {
    fn default() -> Self {
        Self::Offset(HWMON_INDEX_OFFSET)
    }
}

/// Sensor reader over a sysfs tree.
#[derive(Clone, Debug)]
pub struct SysfsSensors {
    root: PathBuf,
    gpu_count: usize,
    hwmon: HwmonLayout,
}

impl Default for SysfsSensors {
    fn default() -> Self {
        Self::new(SYSFS_ROOT, GPU_COUNT, HwmonLayout::default())
    }
}

impl SysfsSensors {
    /// `root` is the sysfs mount point (normally `/sys`).
    pub fn new(root: impl Into<PathBuf>, gpu_count: usize, hwmon: HwmonLayout) -> Self {
        Self { root: root.into(), gpu_count, hwmon }
    }

    pub const fn gpu_count(&self) -> usize {
        self.gpu_count
    }

    fn device_dir(&self, card: usize) -> PathBuf {
        self.root.join("class/drm").join(format!("card{card}")).join("device")
    }

    fn utilization_path(&self, card: usize) -> PathBuf {
        self.device_dir(card).join("gpu_busy_percent")
    }

    fn power_path(&self, card: usize) -> Result<PathBuf, SensorError> {
        let hwmon_root = self.device_dir(card).join("hwmon");
        let hwmon_dir = match self.hwmon {
            HwmonLayout::Offset(offset) => hwmon_root.join(format!("hwmon{}", card + offset)),
            HwmonLayout::Discover => discover_hwmon(&hwmon_root)?,
        };
        Ok(hwmon_dir.join("power1_average"))
    }

    fn cards(&self) -> impl Iterator<Item = usize> {
        1..=self.gpu_count
    }
}

impl SensorReader for SysfsSensors {
    fn read_utilizations(&self) -> Result<Vec<u32>, SensorError> {
        self.cards().map(|card| read_integer(&self.utilization_path(card))).collect()
    }

    fn read_power_draws(&self) -> Result<Vec<u64>, SensorError> {
        self.cards()
            .map(|card| {
                let raw: u64 = read_integer(&self.power_path(card)?)?;
                Ok(raw / POWER_DIVISOR)
            })
            .collect()
    }
}

// =============================================================================
// Fault Tracking
// =============================================================================

/// Absorbs sensor failures so one bad read never stops the caller.
///
/// The first failure of an episode is logged at `warn`, repeats at `debug`,
/// and the first success afterwards at `info`.
#[derive(Debug, Default)]
pub struct SensorHealth {
    failures: u64,
}

impl SensorHealth {
    pub const fn new() -> Self {
        Self { failures: 0 }
    }

    /// Pass a reading through, logging and discarding it if it failed.
    pub fn check<T>(&mut self, result: Result<T, SensorError>) -> Option<T> {
        match result {
            Ok(value) => {
                if self.failures > 0 {
                    info!(failed_reads = self.failures, "Sensor reads recovered");
                    self.failures = 0;
                }
                Some(value)
            }
            Err(e) => {
                self.failures += 1;
                if self.failures == 1 {
                    warn!(error = %e, "Sensor read failed, keeping last dashboard values");
                } else {
                    debug!(error = %e, failures = self.failures, "Sensor read still failing");
                }
                None
            }
        }
    }

    /// Whether the most recent reading failed.
    #[cfg(test)]
    pub(crate) const fn is_faulted(&self) -> bool {
        self.failures > 0
    }

    /// Consecutive failed readings.
    #[cfg(test)]
    pub(crate) const fn failures(&self) -> u64 {
        self.failures
    }
}

/// Lowest-numbered `hwmon*` directory under `dir`.
fn discover_hwmon(dir: &Path) -> Result<PathBuf, SensorError> {
    let entries = fs::read_dir(dir).map_err(|source| SensorError::Read { path: dir.to_path_buf(), source })?;
    entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name();
            let index: usize = name.to_str()?.strip_prefix("hwmon")?.parse().ok()?;
            Some((index, entry.path()))
        })
        .min_by_key(|(index, _)| *index)
        .map(|(_, path)| path)
        .ok_or_else(|| SensorError::MissingHwmon(dir.to_path_buf()))
}

/// Read a file holding a single integer, ignoring surrounding whitespace.
fn read_integer<T: std::str::FromStr>(path: &Path) -> Result<T, SensorError> {
    let contents = fs::read_to_string(path).map_err(|source| SensorError::Read { path: path.to_path_buf(), source })?;
    let value = contents.trim();
    value
        .parse()
        .map_err(|_| SensorError::Parse { path: path.to_path_buf(), value: value.to_owned() })
}

// =============================================================================
// Unit Tests
// =============================================================================
