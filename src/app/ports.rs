//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Orchestrator (domain)
//! ```
//!
//! Driven adapters (sensor hub, LED strip, camera pipeline, status display,
//! event log) implement these traits.  The
//! [`Orchestrator`](super::orchestrator::Orchestrator) consumes them via
//! generics at each call site, so the domain core never touches hardware
//! directly and every port can be replaced by a recording mock in tests.

use core::time::Duration;

use crate::app::status::{StatusNotice, StatusRecord};
use crate::classify::ClassificationResult;
use crate::config::SystemConfig;
use crate::error::ActuatorError;
use crate::fsm::WindowId;
use crate::sensors::SensorSample;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per tick.
pub trait SensorPort {
    /// Read both sensors.  Must return within `timeout`; faults come back
    /// as degraded data inside the sample, never as an error.
    fn sample(&mut self, timeout: Duration) -> SensorSample;
}

// ───────────────────────────────────────────────────────────────
// Illumination port (driven adapter: domain → LED strip)
// ───────────────────────────────────────────────────────────────

pub trait IlluminationPort {
    /// Switch the light source.  Idempotent: repeating the current value
    /// is harmless.
    fn set_active(&mut self, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Imaging port (driven adapter: domain ↔ camera + classifier)
// ───────────────────────────────────────────────────────────────

/// Camera and inference pipeline.
///
/// `classify` may only be called between a matching `activate` and
/// `deactivate`.  The window id lets asynchronous implementations drop
/// results that belong to a window which has since closed.
pub trait ImagingPort {
    fn activate(&mut self) -> Result<(), ActuatorError>;

    fn deactivate(&mut self) -> Result<(), ActuatorError>;

    /// Returns the best recognised object, or `None` when nothing cleared
    /// the pipeline's own confidence threshold (or no result is ready yet).
    fn classify(&mut self, window: WindowId) -> Option<ClassificationResult>;
}

// ───────────────────────────────────────────────────────────────
// Status sink port (driven adapter: domain → display)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget status output.  Render failures are logged by the
/// caller and never affect orchestration.
pub trait StatusSink {
    fn render(&mut self, record: &StatusRecord) -> Result<(), RenderError>;

    /// One-off notices (sensor degraded / recovered).
    fn notify(&mut self, notice: &StatusNotice) -> Result<(), RenderError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic milliseconds since an arbitrary epoch (usually boot).
pub trait TimePort {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ← config source)
// ───────────────────────────────────────────────────────────────

/// Loads system configuration once at startup.
///
/// Implementations MUST run [`SystemConfig::validate`] before returning;
/// invalid ranges are rejected with [`ConfigError::ValidationFailed`], not
/// silently clamped.
pub trait ConfigPort {
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config source exists.
    NotFound,
    /// The source could not be parsed.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the backing store.
    IoError,
}

/// Errors from [`StatusSink`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// The display did not acknowledge (I²C NACK, closed pipe, ...).
    Unavailable,
    /// A line did not fit the display width.
    Overflow,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl core::fmt::Display for RenderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "display unavailable"),
            Self::Overflow => write!(f, "line overflow"),
        }
    }
}

impl std::error::Error for RenderError {}
