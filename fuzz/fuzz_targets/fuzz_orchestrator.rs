//! Fuzz target: `Orchestrator::tick`
//!
//! Every input byte is one tick's sensor sample:
//!
//! - bits 0–5: distance in 2 cm steps (0–126 cm)
//! - bit 6:    light is dark
//! - bit 7:    distance read timed out
//!
//! Asserts that hardware commands strictly alternate on/off, that classify
//! only happens inside an imaging window, and that release leaves
//! everything off.
//!
//! cargo fuzz run fuzz_orchestrator

#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use sortbin::app::events::AppEvent;
use sortbin::app::orchestrator::Orchestrator;
use sortbin::app::ports::{
    EventSink, IlluminationPort, ImagingPort, RenderError, SensorPort, StatusSink,
};
use sortbin::app::status::{StatusNotice, StatusRecord};
use sortbin::classify::ClassificationResult;
use sortbin::config::SystemConfig;
use sortbin::error::{ActuatorError, SensorError};
use sortbin::fsm::WindowId;
use sortbin::sensors::{DistanceReading, LightLevel, SensorSample};

struct Rig {
    next: SensorSample,
    light: Option<bool>,
}

fn decode(byte: u8) -> SensorSample {
    let timed_out = byte & 0x80 != 0;
    SensorSample {
        distance: if timed_out {
            DistanceReading::invalid()
        } else {
            DistanceReading::valid(f32::from(byte & 0x3f) * 2.0)
        },
        light: if byte & 0x40 != 0 { LightLevel::Dark } else { LightLevel::Bright },
        distance_fault: timed_out.then_some(SensorError::Timeout),
        light_fault: None,
    }
}

impl SensorPort for Rig {
    fn sample(&mut self, _timeout: Duration) -> SensorSample {
        self.next
    }
}

impl IlluminationPort for Rig {
    fn set_active(&mut self, on: bool) -> Result<(), ActuatorError> {
        assert_ne!(self.light, Some(on), "repeated illumination command");
        self.light = Some(on);
        Ok(())
    }
}

struct Camera(Option<bool>);

impl ImagingPort for Camera {
    fn activate(&mut self) -> Result<(), ActuatorError> {
        assert_ne!(self.0, Some(true), "activate while active");
        self.0 = Some(true);
        Ok(())
    }

    fn deactivate(&mut self) -> Result<(), ActuatorError> {
        assert_eq!(self.0, Some(true), "deactivate while inactive");
        self.0 = Some(false);
        Ok(())
    }

    fn classify(&mut self, _window: WindowId) -> Option<ClassificationResult> {
        assert_eq!(self.0, Some(true), "classify outside a window");
        None
    }
}

struct Null;

impl StatusSink for Null {
    fn render(&mut self, _record: &StatusRecord) -> Result<(), RenderError> {
        Ok(())
    }

    fn notify(&mut self, _notice: &StatusNotice) -> Result<(), RenderError> {
        Ok(())
    }
}

impl EventSink for Null {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = SystemConfig {
        illumination_duration_ms: 1_000,
        imaging_duration_ms: 1_600,
        sensor_fault_limit: 3,
        ..SystemConfig::default()
    };
    let tick = u64::from(config.tick_interval_ms);
    let mut orch = Orchestrator::new(config);
    let mut rig = Rig {
        next: decode(0),
        light: None,
    };
    let mut camera = Camera(None);

    for (i, &byte) in data.iter().enumerate() {
        rig.next = decode(byte);
        let record = orch.tick(i as u64 * tick, &mut rig, &mut camera, &mut Null, &mut Null);
        assert_eq!(record.illumination, rig.light == Some(true));
        assert_eq!(record.imaging, camera.0 == Some(true));
    }

    orch.release(&mut rig, &mut camera, &mut Null);
    assert_ne!(rig.light, Some(true));
    assert_ne!(camera.0, Some(true));
});
