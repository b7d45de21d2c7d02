//! Scripted peripherals for the host simulation.
//!
//! Everything here is driven by the wall clock so the simulation behaves
//! like the station in real time:
//!
//! - [`SimDistance`]: objects "visit" the bin on a repeating schedule;
//!   every n-th read can be made to time out.
//! - [`SimLight`]: dark for the first part of every cycle.
//! - [`SimPipeline`]: a slow detector cycling through canned frames,
//!   reduced to one result with [`select_best`].

use core::time::Duration;

use log::debug;

use crate::adapters::time::MonotonicClock;
use crate::app::ports::{ImagingPort, TimePort};
use crate::classify::{ClassificationResult, Detection, LabelMap, select_best};
use crate::error::{ActuatorError, SensorError};
use crate::fsm::WindowId;
use crate::sensors::{DistanceSensor, LightLevel, LightSensor};

/// Reading when nothing is in front of the sensor.
const EMPTY_BIN_CM: f32 = 180.0;

// ── Distance ──────────────────────────────────────────────────

/// An object held in front of the sensor for `[from_ms, until_ms)` of
/// every cycle.
#[derive(Debug, Clone, Copy)]
pub struct Visit {
    pub from_ms: u64,
    pub until_ms: u64,
    pub distance_cm: f32,
}

pub struct SimDistance {
    clock: MonotonicClock,
    period_ms: u64,
    visits: Vec<Visit>,
    dropout_every: Option<u32>,
    reads: u32,
}

impl SimDistance {
    pub fn new(clock: MonotonicClock, period_ms: u64, visits: Vec<Visit>) -> Self {
        Self {
            clock,
            period_ms: period_ms.max(1),
            visits,
            dropout_every: None,
            reads: 0,
        }
    }

    /// 40 s cycle: a quick drop-off, a brief pass-by, and a long stay.
    pub fn demo(clock: MonotonicClock) -> Self {
        Self::new(
            clock,
            40_000,
            vec![
                Visit { from_ms: 2_000, until_ms: 5_000, distance_cm: 25.0 },
                Visit { from_ms: 12_000, until_ms: 12_600, distance_cm: 30.0 },
                Visit { from_ms: 20_000, until_ms: 28_000, distance_cm: 35.0 },
            ],
        )
    }

    /// Make every `n`-th read time out.
    pub fn with_dropouts(mut self, n: u32) -> Self {
        self.dropout_every = (n > 0).then_some(n);
        self
    }
}

impl DistanceSensor for SimDistance {
    fn read(&mut self, _timeout: Duration) -> Result<f32, SensorError> {
        self.reads = self.reads.wrapping_add(1);
        if self.dropout_every.is_some_and(|n| self.reads % n == 0) {
            return Err(SensorError::Timeout);
        }

        let t = self.clock.now_ms() % self.period_ms;
        let cm = self
            .visits
            .iter()
            .find(|v| (v.from_ms..v.until_ms).contains(&t))
            .map_or(EMPTY_BIN_CM, |v| v.distance_cm);
        Ok(cm)
    }
}

// ── Light ─────────────────────────────────────────────────────

pub struct SimLight {
    clock: MonotonicClock,
    period_ms: u64,
    dark_ms: u64,
}

impl SimLight {
    /// Dark for the first `dark_ms` of every `period_ms`.
    pub fn new(clock: MonotonicClock, period_ms: u64, dark_ms: u64) -> Self {
        Self {
            clock,
            period_ms: period_ms.max(1),
            dark_ms,
        }
    }
}

impl LightSensor for SimLight {
    fn read(&mut self) -> Result<LightLevel, SensorError> {
        let t = self.clock.now_ms() % self.period_ms;
        Ok(if t < self.dark_ms {
            LightLevel::Dark
        } else {
            LightLevel::Bright
        })
    }
}

// ── Imaging ───────────────────────────────────────────────────

type Frame = &'static [(&'static str, f32)];

const DEMO_FRAMES: &[Frame] = &[
    &[("plastic", 0.91), ("paper", 0.42)],
    &[],
    &[("person", 0.95)],
    &[("cardboard", 0.72), ("paper", 0.65)],
    &[("green-glass", 0.58)],
    &[("green-glass", 0.88)],
    &[("organic", 0.77)],
];

pub struct SimPipeline {
    latency: Duration,
    min_confidence: f32,
    labels: LabelMap<'static>,
    frames: &'static [Frame],
    next: usize,
    active: bool,
}

impl SimPipeline {
    pub fn new(latency: Duration, min_confidence: f32) -> Self {
        Self {
            latency,
            min_confidence,
            labels: LabelMap::default(),
            frames: DEMO_FRAMES,
            next: 0,
            active: false,
        }
    }
}

impl ImagingPort for SimPipeline {
    fn activate(&mut self) -> Result<(), ActuatorError> {
        debug!("sim camera: powered up");
        self.active = true;
        Ok(())
    }

    fn deactivate(&mut self) -> Result<(), ActuatorError> {
        debug!("sim camera: powered down");
        self.active = false;
        Ok(())
    }

    fn classify(&mut self, window: WindowId) -> Option<ClassificationResult> {
        debug_assert!(self.active, "classify outside activate/deactivate");
        std::thread::sleep(self.latency);

        let frame = self.frames.get(self.next % self.frames.len().max(1)).copied().unwrap_or(&[]);
        self.next = self.next.wrapping_add(1);

        let detections: Vec<Detection<'_>> = frame
            .iter()
            .map(|&(class_name, confidence)| Detection { class_name, confidence })
            .collect();
        let best = select_best(&detections, &self.labels, self.min_confidence);
        debug!("sim camera: window {} frame -> {:?}", window, best);
        best
    }
}
