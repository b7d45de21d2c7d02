//! HC-SR04 ultrasonic ranger.
//!
//! ## Measurement
//!
//! ```text
//!   TRIG  ──┐10µs┌──────────────────────────────────
//!           └────┘
//!   ECHO  ───────────────┐  pulse_us  ┌─────────────
//!                        └────────────┘
//!         |<----------- timeout (shared deadline) ----------->|
//! ```
//!
//! distance_cm = pulse_us × 0.0343 / 2   (speed of sound 343 m/s, round trip)
//!
//! Both echo edges are awaited against a single deadline computed when the
//! read starts, so one call can never take longer than `timeout` plus the
//! 12 µs trigger sequence.  The module is rated for 2–400 cm; anything
//! outside that is `OutOfRange`.
//!
//! Written against `embedded-hal` 1.0 so the same driver runs on the ESP32
//! (raw GPIO wrappers from [`hw_init`](crate::drivers::hw_init)) and against
//! mock pins in tests.

use core::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use super::DistanceSensor;
use crate::error::SensorError;

/// Speed of sound in cm/µs at ~20 °C.
const SPEED_OF_SOUND_CM_PER_US: f32 = 0.0343;
const TRIGGER_PULSE_US: u32 = 10;
const MIN_RANGE_CM: f32 = 2.0;
const MAX_RANGE_CM: f32 = 400.0;

/// Free-running microsecond counter used to time the echo pulse.
pub trait EchoClock {
    fn now_us(&self) -> u64;
}

pub struct Hcsr04<TRIG, ECHO, DELAY, CLK> {
    trigger: TRIG,
    echo: ECHO,
    delay: DELAY,
    clock: CLK,
}

impl<TRIG, ECHO, DELAY, CLK> Hcsr04<TRIG, ECHO, DELAY, CLK>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    DELAY: DelayNs,
    CLK: EchoClock,
{
    pub fn new(trigger: TRIG, echo: ECHO, delay: DELAY, clock: CLK) -> Self {
        Self {
            trigger,
            echo,
            delay,
            clock,
        }
    }

    fn pulse_trigger(&mut self) -> Result<(), SensorError> {
        self.trigger.set_low().map_err(|_| SensorError::GpioFault)?;
        self.delay.delay_us(2);
        self.trigger.set_high().map_err(|_| SensorError::GpioFault)?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low().map_err(|_| SensorError::GpioFault)
    }

    /// Spin until ECHO reads `high`, returning the timestamp of the edge.
    fn wait_for(&mut self, high: bool, deadline_us: u64) -> Result<u64, SensorError> {
        loop {
            let now = self.clock.now_us();
            if self.echo.is_high().map_err(|_| SensorError::GpioFault)? == high {
                return Ok(now);
            }
            if now >= deadline_us {
                return Err(SensorError::Timeout);
            }
        }
    }
}

/// Convert an echo pulse width into a range-checked distance.
pub fn pulse_to_cm(pulse_us: u64) -> Result<f32, SensorError> {
    let cm = pulse_us as f32 * SPEED_OF_SOUND_CM_PER_US / 2.0;
    if !(MIN_RANGE_CM..=MAX_RANGE_CM).contains(&cm) {
        return Err(SensorError::OutOfRange);
    }
    Ok(cm)
}

impl<TRIG, ECHO, DELAY, CLK> DistanceSensor for Hcsr04<TRIG, ECHO, DELAY, CLK>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    DELAY: DelayNs,
    CLK: EchoClock,
{
    fn read(&mut self, timeout: Duration) -> Result<f32, SensorError> {
        let timeout_us = u64::try_from(timeout.as_micros()).unwrap_or(u64::MAX);
        self.pulse_trigger()?;
        let deadline = self.clock.now_us().saturating_add(timeout_us);

        let rise = self.wait_for(true, deadline)?;
        let fall = self.wait_for(false, deadline)?;
        pulse_to_cm(fall.saturating_sub(rise))
    }
}
