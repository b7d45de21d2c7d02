//! LED strip illumination driver.
//!
//! The strip is switched through a logic-level MOSFET (enable GPIO) and
//! dimmed with LEDC PWM.  Brightness is configured once; the orchestrator
//! only ever asks for on/off through [`IlluminationPort`].
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real enable pin and LEDC channel via hw_init.
//! On host/test: hw_init calls are no-ops and the state is tracked in memory.

use log::{debug, warn};

use crate::app::ports::IlluminationPort;
use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IlluminationState {
    Off,
    On { duty: u8 },
    /// Last hardware command failed; the next command retries.
    Faulted(ActuatorError),
}

pub struct IlluminationDriver {
    state: IlluminationState,
    brightness_percent: u8,
}

impl IlluminationDriver {
    pub fn new(brightness_percent: u8) -> Self {
        Self {
            state: IlluminationState::Off,
            brightness_percent: brightness_percent.clamp(1, 100),
        }
    }

    /// Switch on at `brightness` percent (0 switches off).
    pub fn enable(&mut self, brightness: u8) -> Result<(), ActuatorError> {
        let duty = brightness.min(100);
        if duty == 0 {
            return self.disable();
        }

        let result = hw_init::gpio_write(pins::ILLUMINATION_ENABLE_GPIO, true)
            .and_then(|()| Self::set_duty_hw(duty));
        match result {
            Ok(()) => {
                self.state = IlluminationState::On { duty };
                debug!("illumination: on at {}%", duty);
                Ok(())
            }
            Err(e) => self.fault(e),
        }
    }

    /// Switch off.  PWM goes to zero first so the strip never flashes at
    /// full brightness when the enable pin is re-asserted.
    pub fn disable(&mut self) -> Result<(), ActuatorError> {
        let result = Self::set_duty_hw(0)
            .and_then(|()| hw_init::gpio_write(pins::ILLUMINATION_ENABLE_GPIO, false));
        match result {
            Ok(()) => {
                self.state = IlluminationState::Off;
                debug!("illumination: off");
                Ok(())
            }
            Err(e) => self.fault(e),
        }
    }

    fn fault(&mut self, e: ActuatorError) -> Result<(), ActuatorError> {
        warn!("illumination: hardware command failed: {}", e);
        self.state = IlluminationState::Faulted(e);
        Err(e)
    }

    fn set_duty_hw(duty_percent: u8) -> Result<(), ActuatorError> {
        hw_init::ledc_set(hw_init::LEDC_CH_ILLUMINATION, duty_counts(duty_percent))
    }

    pub fn state(&self) -> IlluminationState {
        self.state
    }

    pub fn is_on(&self) -> bool {
        matches!(self.state, IlluminationState::On { .. })
    }

    pub fn brightness_percent(&self) -> u8 {
        self.brightness_percent
    }
}

impl IlluminationPort for IlluminationDriver {
    fn set_active(&mut self, on: bool) -> Result<(), ActuatorError> {
        match (on, self.state) {
            (true, IlluminationState::On { .. }) | (false, IlluminationState::Off) => Ok(()),
            (true, _) => self.enable(self.brightness_percent),
            (false, _) => self.disable(),
        }
    }
}

/// Percent → LEDC duty counts at [`pins::PWM_RESOLUTION_BITS`].
fn duty_counts(duty_percent: u8) -> u8 {
    let full_scale = (1u32 << pins::PWM_RESOLUTION_BITS) - 1;
    (u32::from(duty_percent.min(100)) * full_scale / 100) as u8
}
