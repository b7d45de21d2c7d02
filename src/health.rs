//! Sensor health watchdog.
//!
//! Runs every tick right after sampling.  Each sensor has a counter of
//! consecutive failed reads; a good read resets it.
//!
//! ## Degraded lifecycle
//!
//! 1. A read fails: the counter increments, nothing is reported.
//! 2. The counter reaches `sensor_fault_limit`: the sensor's bit is
//!    latched in the degraded mask and **one**
//!    [`StatusNotice::SensorDegraded`] is returned.
//! 3. Further failures keep the bit latched and report nothing.
//! 4. The first good read clears the bit and returns **one**
//!    [`StatusNotice::SensorRecovered`].
//!
//! The orchestrator keeps looping throughout; a degraded sensor only ever
//! produces conservative data (invalid distance, last-known light).

use core::fmt;

use heapless::Vec;
use log::{error, info};

use crate::app::status::StatusNotice;
use crate::error::SensorError;
use crate::sensors::SensorSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SensorKind {
    Distance = 0b01,
    Light = 0b10,
}

impl SensorKind {
    pub fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distance => write!(f, "distance"),
            Self::Light => write!(f, "light"),
        }
    }
}

/// Notices produced by one [`SensorHealth::evaluate`] call (at most one
/// per sensor).
pub type Notices = Vec<StatusNotice, 2>;

pub struct SensorHealth {
    limit: u16,
    distance_failures: u16,
    light_failures: u16,
    /// Latched degraded bitmask.
    degraded: u8,
}

impl SensorHealth {
    pub fn new(limit: u16) -> Self {
        Self {
            limit: limit.max(1),
            distance_failures: 0,
            light_failures: 0,
            degraded: 0,
        }
    }

    /// Update the counters from this tick's sample.
    pub fn evaluate(&mut self, sample: &SensorSample) -> Notices {
        let mut notices = Notices::new();
        if let Some(n) = self.eval_sensor(SensorKind::Distance, sample.distance_fault) {
            // Capacity 2, at most one push per sensor.
            let _ = notices.push(n);
        }
        if let Some(n) = self.eval_sensor(SensorKind::Light, sample.light_fault) {
            let _ = notices.push(n);
        }
        notices
    }

    pub fn is_degraded(&self, kind: SensorKind) -> bool {
        self.degraded & kind.mask() != 0
    }

    pub fn degraded_mask(&self) -> u8 {
        self.degraded
    }

    pub fn consecutive_failures(&self, kind: SensorKind) -> u16 {
        match kind {
            SensorKind::Distance => self.distance_failures,
            SensorKind::Light => self.light_failures,
        }
    }

    // ── Internal ──────────────────────────────────────────────────

    fn eval_sensor(&mut self, kind: SensorKind, fault: Option<SensorError>) -> Option<StatusNotice> {
        let limit = self.limit;
        let counter = match kind {
            SensorKind::Distance => &mut self.distance_failures,
            SensorKind::Light => &mut self.light_failures,
        };

        match fault {
            Some(e) => {
                *counter = counter.saturating_add(1);
                if *counter >= limit && self.degraded & kind.mask() == 0 {
                    error!("SENSOR DEGRADED: {kind} ({} consecutive failures, last: {e})", *counter);
                    self.degraded |= kind.mask();
                    return Some(StatusNotice::SensorDegraded(kind));
                }
                None
            }
            None => {
                *counter = 0;
                if self.degraded & kind.mask() != 0 {
                    info!("SENSOR RECOVERED: {kind}");
                    self.degraded &= !kind.mask();
                    return Some(StatusNotice::SensorRecovered(kind));
                }
                None
            }
        }
    }
}
