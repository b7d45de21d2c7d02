//! Mock adapters for integration tests.
//!
//! Every port call is appended to one shared [`CallLog`] so tests can
//! assert on the full command history, in order, across adapters, without
//! touching real GPIO/PWM registers.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use sortbin::app::events::AppEvent;
use sortbin::app::ports::{
    EventSink, IlluminationPort, ImagingPort, RenderError, SensorPort, StatusSink,
};
use sortbin::app::status::{StatusNotice, StatusRecord};
use sortbin::classify::ClassificationResult;
use sortbin::error::{ActuatorError, SensorError};
use sortbin::fsm::WindowId;
use sortbin::sensors::{DistanceReading, LightLevel, SensorSample};

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetIllumination(bool),
    Activate,
    Deactivate,
    Classify(WindowId),
    Notify(StatusNotice),
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

#[allow(dead_code)]
impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.0.borrow().iter().filter(|c| *c == call).count()
    }

    pub fn count_classify(&self) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Classify(_)))
            .count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

// ── Samples ───────────────────────────────────────────────────

pub fn sample(distance_cm: f32, light: LightLevel) -> SensorSample {
    SensorSample {
        distance: DistanceReading::valid(distance_cm),
        light,
        distance_fault: None,
        light_fault: None,
    }
}

pub fn timeout_sample(light: LightLevel) -> SensorSample {
    SensorSample {
        distance: DistanceReading::invalid(),
        light,
        distance_fault: Some(SensorError::Timeout),
        light_fault: None,
    }
}

// ── MockHardware ──────────────────────────────────────────────

/// Scripted sensors plus a recording LED strip.
///
/// Samples are consumed one per tick; when the script runs out the last
/// sample repeats.
pub struct MockHardware {
    log: CallLog,
    script: VecDeque<SensorSample>,
    last: SensorSample,
    /// Number of upcoming `set_active` calls that fail.
    pub fail_illumination: u32,
    pub illumination_on: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            script: VecDeque::new(),
            last: sample(200.0, LightLevel::Bright),
            fail_illumination: 0,
            illumination_on: false,
        }
    }

    pub fn push(&mut self, s: SensorSample) -> &mut Self {
        self.script.push_back(s);
        self
    }

    pub fn push_n(&mut self, s: SensorSample, n: usize) -> &mut Self {
        self.script.extend(std::iter::repeat_n(s, n));
        self
    }
}

impl SensorPort for MockHardware {
    fn sample(&mut self, _timeout: Duration) -> SensorSample {
        if let Some(s) = self.script.pop_front() {
            self.last = s;
        }
        self.last
    }
}

impl IlluminationPort for MockHardware {
    fn set_active(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.log.push(Call::SetIllumination(on));
        if self.fail_illumination > 0 {
            self.fail_illumination -= 1;
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.illumination_on = on;
        Ok(())
    }
}

// ── MockImaging ───────────────────────────────────────────────

/// Recording camera.  Panics if `classify` is called while inactive.
pub struct MockImaging {
    log: CallLog,
    results: VecDeque<Option<ClassificationResult>>,
    pub active: bool,
    /// Number of upcoming `activate` calls that fail.
    pub fail_activate: u32,
    /// Number of upcoming `deactivate` calls that fail.
    pub fail_deactivate: u32,
}

#[allow(dead_code)]
impl MockImaging {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            results: VecDeque::new(),
            active: false,
            fail_activate: 0,
            fail_deactivate: 0,
        }
    }

    /// Queue the answers for upcoming classify calls; `None` afterwards.
    pub fn answer(&mut self, result: Option<ClassificationResult>) -> &mut Self {
        self.results.push_back(result);
        self
    }
}

impl ImagingPort for MockImaging {
    fn activate(&mut self) -> Result<(), ActuatorError> {
        self.log.push(Call::Activate);
        if self.fail_activate > 0 {
            self.fail_activate -= 1;
            return Err(ActuatorError::ImagingUnavailable);
        }
        self.active = true;
        Ok(())
    }

    fn deactivate(&mut self) -> Result<(), ActuatorError> {
        self.log.push(Call::Deactivate);
        if self.fail_deactivate > 0 {
            self.fail_deactivate -= 1;
            return Err(ActuatorError::ImagingUnavailable);
        }
        self.active = false;
        Ok(())
    }

    fn classify(&mut self, window: WindowId) -> Option<ClassificationResult> {
        assert!(self.active, "classify called outside activate/deactivate");
        self.log.push(Call::Classify(window));
        self.results.pop_front().flatten()
    }
}

// ── Sinks ─────────────────────────────────────────────────────

pub struct RecordingStatus {
    log: CallLog,
    pub records: Vec<StatusRecord>,
    pub fail_render: bool,
}

#[allow(dead_code)]
impl RecordingStatus {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            records: Vec::new(),
            fail_render: false,
        }
    }
}

impl StatusSink for RecordingStatus {
    fn render(&mut self, record: &StatusRecord) -> Result<(), RenderError> {
        if self.fail_render {
            return Err(RenderError::Unavailable);
        }
        self.records.push(record.clone());
        Ok(())
    }

    fn notify(&mut self, notice: &StatusNotice) -> Result<(), RenderError> {
        self.log.push(Call::Notify(*notice));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEvents {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RecordingEvents {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
