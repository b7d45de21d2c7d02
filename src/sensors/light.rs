//! Digital LDR (photoresistor + comparator) module.
//!
//! The comparator output flips at a threshold set by the module's trim pot,
//! so the driver only sees dark/bright.  Most modules pull the output HIGH
//! in the dark; the polarity is configurable for the ones that don't.

use embedded_hal::digital::InputPin;

use super::{LightLevel, LightSensor};
use crate::error::SensorError;

pub struct Ldr<P> {
    pin: P,
    dark_when_high: bool,
}

impl<P: InputPin> Ldr<P> {
    /// HIGH = dark.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            dark_when_high: true,
        }
    }

    pub fn with_polarity(pin: P, dark_when_high: bool) -> Self {
        Self {
            pin,
            dark_when_high,
        }
    }
}

impl<P: InputPin> LightSensor for Ldr<P> {
    fn read(&mut self) -> Result<LightLevel, SensorError> {
        let high = self.pin.is_high().map_err(|_| SensorError::GpioFault)?;
        Ok(if high == self.dark_when_high {
            LightLevel::Dark
        } else {
            LightLevel::Bright
        })
    }
}
