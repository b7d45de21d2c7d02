//! System configuration parameters
//!
//! All tunable parameters for the SortBin station.  Values are static for a
//! process run: the firmware uses the compiled-in defaults, the host
//! simulation may load them from a JSON file (see
//! [`JsonConfigFile`](crate::adapters::config_file::JsonConfigFile)).

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Proximity ---
    /// An object closer than this (cm) counts as present.
    pub motion_threshold_cm: f32,

    // --- Illumination ---
    /// How long the LED strip stays lit after the last dark + motion tick (ms)
    pub illumination_duration_ms: u32,
    /// LED strip PWM brightness (1-100%)
    pub illumination_brightness_percent: u8,

    // --- Imaging ---
    /// How long the camera stays powered after the last motion tick (ms)
    pub imaging_duration_ms: u32,
    /// Minimum spacing between classification calls while imaging (ms).
    /// 0 classifies on every tick.
    pub classify_interval_ms: u32,
    /// Detections at or below this confidence (0.0-1.0) are ignored.
    pub min_confidence: f32,

    // --- Sensors ---
    /// Hard upper bound on a single distance read (ms)
    pub sensor_timeout_ms: u32,
    /// Consecutive failed reads before a sensor is reported degraded
    pub sensor_fault_limit: u16,
    /// Consecutive identical light samples required to switch dark/bright
    pub light_debounce_ticks: u8,

    // --- Timing ---
    /// Control loop interval (ms)
    pub tick_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Proximity
            motion_threshold_cm: 50.0,

            // Illumination
            illumination_duration_ms: 10_000,
            illumination_brightness_percent: 50,

            // Imaging
            imaging_duration_ms: 15_000,
            classify_interval_ms: 0,
            min_confidence: 0.60,

            // Sensors
            sensor_timeout_ms: 100,
            sensor_fault_limit: 10,
            light_debounce_ticks: 1,

            // Timing
            tick_interval_ms: 200, // 5 Hz
        }
    }
}

impl SystemConfig {
    /// Reject out-of-range values instead of silently clamping them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.motion_threshold_cm.is_finite() && self.motion_threshold_cm > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "motion_threshold_cm must be a positive distance",
            ));
        }
        if self.illumination_duration_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "illumination_duration_ms must be > 0",
            ));
        }
        if !(1..=100).contains(&self.illumination_brightness_percent) {
            return Err(ConfigError::ValidationFailed(
                "illumination_brightness_percent must be 1-100",
            ));
        }
        if self.imaging_duration_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "imaging_duration_ms must be > 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::ValidationFailed(
                "min_confidence must be within 0.0-1.0",
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        if self.sensor_timeout_ms == 0 || self.sensor_timeout_ms >= self.tick_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "sensor_timeout_ms must be > 0 and shorter than tick_interval_ms",
            ));
        }
        if self.sensor_fault_limit == 0 {
            return Err(ConfigError::ValidationFailed("sensor_fault_limit must be >= 1"));
        }
        if self.light_debounce_ticks == 0 {
            return Err(ConfigError::ValidationFailed(
                "light_debounce_ticks must be >= 1",
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms as u64)
    }

    pub fn sensor_timeout(&self) -> Duration {
        Duration::from_millis(self.sensor_timeout_ms as u64)
    }
}
