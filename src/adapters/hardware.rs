//! Hardware adapter: bridges the station peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the LED strip driver, exposing them through
//! [`SensorPort`] and [`IlluminationPort`].  Generic over the two sensor
//! drivers so the firmware plugs in the HC-SR04 / LDR pair and the host
//! simulation plugs in scripted ones.

use core::time::Duration;

use crate::app::ports::{IlluminationPort, SensorPort};
use crate::drivers::illumination::IlluminationDriver;
use crate::error::ActuatorError;
use crate::sensors::{DistanceSensor, LightSensor, SensorHub, SensorSample};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<D, L> {
    sensor_hub: SensorHub<D, L>,
    illumination: IlluminationDriver,
}

impl<D: DistanceSensor, L: LightSensor> HardwareAdapter<D, L> {
    pub fn new(sensor_hub: SensorHub<D, L>, illumination: IlluminationDriver) -> Self {
        Self {
            sensor_hub,
            illumination,
        }
    }

    pub fn illumination(&self) -> &IlluminationDriver {
        &self.illumination
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<D: DistanceSensor, L: LightSensor> SensorPort for HardwareAdapter<D, L> {
    fn sample(&mut self, timeout: Duration) -> SensorSample {
        self.sensor_hub.read_all(timeout)
    }
}

// ── IlluminationPort implementation ───────────────────────────

impl<D: DistanceSensor, L: LightSensor> IlluminationPort for HardwareAdapter<D, L> {
    fn set_active(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.illumination.set_active(on)
    }
}
