//! SortBin station library.
//!
//! Exposes the control logic, drivers and adapters to both binaries
//! (`sortbin` on the ESP32-S3, `sortbin-sim` on the host) and to the
//! integration tests.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod classify;
pub mod config;
pub mod display;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod health;
pub mod pins;
pub mod runtime;
pub mod sensors;
