//! Imaging pipeline stand-in for boards without a camera.
//!
//! The ESP32 station has no camera attached; frames are classified by an
//! external host.  [`NoCamera`] accepts the lifecycle commands so the
//! imaging window still runs (and shows `CAM: ACTIVE` on the display) but
//! never produces a result.

use log::info;

use crate::app::ports::ImagingPort;
use crate::classify::ClassificationResult;
use crate::error::ActuatorError;
use crate::fsm::WindowId;

#[derive(Debug, Default)]
pub struct NoCamera {
    active: bool,
    announced: bool,
}

impl NoCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl ImagingPort for NoCamera {
    fn activate(&mut self) -> Result<(), ActuatorError> {
        if !self.announced {
            info!("imaging: no camera attached, classification disabled");
            self.announced = true;
        }
        self.active = true;
        Ok(())
    }

    fn deactivate(&mut self) -> Result<(), ActuatorError> {
        self.active = false;
        Ok(())
    }

    fn classify(&mut self, _window: WindowId) -> Option<ClassificationResult> {
        debug_assert!(self.active, "classify outside activate/deactivate");
        None
    }
}
