//! Application core: pure domain logic, zero I/O.
//!
//! The orchestrator decides when the LED strip and the imaging pipeline
//! run, and what the display shows.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod events;
pub mod orchestrator;
pub mod ports;
pub mod status;
