//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns both drivers and produces a [`SensorSample`] each tick.
//! Driver errors stop here: a failed distance read becomes an invalid
//! [`DistanceReading`], a failed light read repeats the last known level,
//! and the fault itself is reported alongside so the health watchdog can
//! count it.

pub mod distance;
pub mod light;

use core::time::Duration;

use log::{debug, warn};

use crate::error::SensorError;

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// One distance measurement.
///
/// `valid == false` means timeout or out-of-range echo.  It is an unknown
/// state, not "nothing there".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceReading {
    pub distance_cm: f32,
    pub valid: bool,
}

impl DistanceReading {
    pub const fn valid(distance_cm: f32) -> Self {
        Self {
            distance_cm,
            valid: true,
        }
    }

    pub const fn invalid() -> Self {
        Self {
            distance_cm: 0.0,
            valid: false,
        }
    }

    /// Proximity decision: only a valid reading below the threshold counts.
    pub fn is_object_within(&self, threshold_cm: f32) -> bool {
        self.valid && self.distance_cm < threshold_cm
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightLevel {
    Dark,
    /// Safe default before the first sample.
    #[default]
    Bright,
}

/// Everything the orchestrator learns from the sensors in one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub distance: DistanceReading,
    pub light: LightLevel,
    /// Set when the distance read failed this tick.
    pub distance_fault: Option<SensorError>,
    /// Set when the light read failed and `light` is the last known level.
    pub light_fault: Option<SensorError>,
}

// ---------------------------------------------------------------------------
// Driver traits
// ---------------------------------------------------------------------------

/// Request/response ranger.  Must give up after `timeout`.
pub trait DistanceSensor {
    fn read(&mut self, timeout: Duration) -> Result<f32, SensorError>;
}

/// Instantaneous ambient-light sample.
pub trait LightSensor {
    fn read(&mut self) -> Result<LightLevel, SensorError>;
}

// ---------------------------------------------------------------------------
// Hub
// ---------------------------------------------------------------------------

/// Aggregates both sensor drivers and produces a unified sample.
pub struct SensorHub<D, L> {
    distance: D,
    light: L,
    last_light: LightLevel,
}

impl<D: DistanceSensor, L: LightSensor> SensorHub<D, L> {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(distance: D, light: L) -> Self {
        Self {
            distance,
            light,
            last_light: LightLevel::default(),
        }
    }

    /// Read both sensors.  Never fails: the distance driver bounds its own
    /// wait by `timeout`, and errors are folded into the sample.
    pub fn read_all(&mut self, timeout: Duration) -> SensorSample {
        let (distance, distance_fault) = match self.distance.read(timeout) {
            Ok(cm) => (DistanceReading::valid(cm), None),
            Err(e) => {
                debug!("sensors: distance read failed: {}", e);
                (DistanceReading::invalid(), Some(e))
            }
        };

        let (light, light_fault) = match self.light.read() {
            Ok(level) => {
                self.last_light = level;
                (level, None)
            }
            Err(e) => {
                warn!("sensors: light read failed ({}), holding {:?}", e, self.last_light);
                (self.last_light, Some(e))
            }
        };

        SensorSample {
            distance,
            light,
            distance_fault,
            light_fault,
        }
    }
}
