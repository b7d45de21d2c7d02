//! Outbound application events.
//!
//! The [`Orchestrator`](super::orchestrator::Orchestrator) emits these
//! through the [`EventSink`](super::ports::EventSink) port, one per edge,
//! never per tick.  Adapters on the other side decide what to do with them.

use crate::classify::ClassificationResult;
use crate::fsm::WindowId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The orchestrator has started; all resources are off.
    Started,

    /// The LED strip was switched (intended state; the command may have
    /// failed, see the log).
    IlluminationChanged { on: bool },

    /// The imaging pipeline was activated or released.
    ImagingChanged { active: bool, window: WindowId },

    /// A new classification replaced the last known result.
    Classified(ClassificationResult),

    /// Shutdown released every resource.
    Released,
}
