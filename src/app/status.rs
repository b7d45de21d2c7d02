//! Status projection.
//!
//! [`project`] is a pure function of [`OrchestratorState`]: no hidden state,
//! no side effects.  The orchestrator calls it once per tick after every
//! transition has settled and pushes the record to the
//! [`StatusSink`](super::ports::StatusSink).

use crate::app::orchestrator::OrchestratorState;
use crate::classify::ClassificationResult;
use crate::health::SensorKind;
use crate::sensors::LightLevel;

/// What the display shows.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRecord {
    pub motion: bool,
    pub light: LightLevel,
    pub illumination: bool,
    pub imaging: bool,
    pub last_result: Option<ClassificationResult>,
}

/// One-off notices, delivered through
/// [`StatusSink::notify`](super::ports::StatusSink::notify).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusNotice {
    SensorDegraded(SensorKind),
    SensorRecovered(SensorKind),
}

pub fn project(state: &OrchestratorState) -> StatusRecord {
    StatusRecord {
        motion: state.motion,
        light: state.light,
        illumination: state.illumination.is_on(),
        imaging: state.imaging.is_on(),
        last_result: state.last_result.clone(),
    }
}
