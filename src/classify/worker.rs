//! Classification worker thread.
//!
//! Inference on a camera frame takes far longer than one control tick, so
//! the real [`ImagingPort`] runs on its own thread.  [`ClassifierWorker`]
//! is the control loop's handle to it and is itself an [`ImagingPort`], so
//! the orchestrator cannot tell the difference.
//!
//! ```text
//! ┌──────────────┐  Request (FIFO, depth 4)   ┌──────────────────┐
//! │ Control loop │───────────────────────────▶│ classifier thread│
//! │ (sync)       │◀───────────────────────────│ owns the pipeline│
//! └──────────────┘  Outcome (single slot)     └──────────────────┘
//! ```
//!
//! * At most one `Classify` request is in flight.  While one is pending a
//!   new classify call only polls the mailbox and returns.
//! * The result mailbox is an `embassy-sync` [`Signal`]: one slot, read
//!   without blocking, a newer value overwrites an unread one.
//! * Every outcome carries the window id it was requested for.  Outcomes
//!   from an older window are dropped.
//! * Activate / deactivate are queued behind any pending request, so the
//!   pipeline sees them in the order the orchestrator issued them.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use futures_lite::future::block_on;
use log::{debug, error, info, warn};

use super::ClassificationResult;
use crate::app::ports::ImagingPort;
use crate::error::{self, ActuatorError, Error};
use crate::fsm::WindowId;

const REQUEST_DEPTH: usize = 4;
const STOP_RETRY: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Activate,
    Deactivate,
    Classify(WindowId),
    Stop,
}

#[derive(Debug, Clone)]
struct Outcome {
    window: WindowId,
    result: Option<ClassificationResult>,
}

struct Mailbox {
    requests: Channel<CriticalSectionRawMutex, Request, REQUEST_DEPTH>,
    results: Signal<CriticalSectionRawMutex, Outcome>,
}

/// Counters for the sim summary and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub requested: u32,
    /// Classify calls that found a request still in flight.
    pub skipped: u32,
    /// Results dropped because their window had closed.
    pub stale: u32,
}

pub struct ClassifierWorker {
    mailbox: Arc<Mailbox>,
    handle: Option<JoinHandle<()>>,
    in_flight: Option<WindowId>,
    stats: WorkerStats,
}

impl ClassifierWorker {
    /// Move `pipeline` onto a new `classifier` thread.
    pub fn spawn<P>(pipeline: P) -> error::Result<Self>
    where
        P: ImagingPort + Send + 'static,
    {
        let mailbox = Arc::new(Mailbox {
            requests: Channel::new(),
            results: Signal::new(),
        });
        let thread_mailbox = mailbox.clone();
        let handle = std::thread::Builder::new()
            .name("classifier".into())
            .spawn(move || serve(pipeline, &thread_mailbox))
            .map_err(|_| Error::Init("classifier thread spawn failed"))?;

        info!("classifier: worker started");
        Ok(Self {
            mailbox,
            handle: Some(handle),
            in_flight: None,
            stats: WorkerStats::default(),
        })
    }

    pub fn stats(&self) -> WorkerStats {
        self.stats
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    fn enqueue(&self, request: Request) -> Result<(), ActuatorError> {
        self.mailbox.requests.try_send(request).map_err(|_| {
            warn!("classifier: request queue full, dropping {:?}", request);
            ActuatorError::ImagingUnavailable
        })
    }

    /// Take a finished outcome, if any, keeping it only for `window`.
    fn collect(&mut self, window: WindowId) -> Option<ClassificationResult> {
        let outcome = self.mailbox.results.try_take()?;
        self.in_flight = None;
        if outcome.window < window {
            self.stats.stale += 1;
            debug!(
                "classifier: dropping result of closed window {} (current {})",
                outcome.window, window
            );
            return None;
        }
        outcome.result
    }
}

impl ImagingPort for ClassifierWorker {
    fn activate(&mut self) -> Result<(), ActuatorError> {
        self.enqueue(Request::Activate)
    }

    fn deactivate(&mut self) -> Result<(), ActuatorError> {
        self.enqueue(Request::Deactivate)
    }

    fn classify(&mut self, window: WindowId) -> Option<ClassificationResult> {
        let result = self.collect(window);

        if self.in_flight.is_some() {
            self.stats.skipped += 1;
            return result;
        }
        if self.enqueue(Request::Classify(window)).is_ok() {
            self.in_flight = Some(window);
            self.stats.requested += 1;
        }
        result
    }
}

impl Drop for ClassifierWorker {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        // Queue full: wait for the worker to drain a slot, unless it has
        // already exited (a panicked pipeline never drains again).
        while self.mailbox.requests.try_send(Request::Stop).is_err() {
            if handle.is_finished() {
                break;
            }
            std::thread::sleep(STOP_RETRY);
        }
        if handle.join().is_err() {
            error!("classifier: worker thread panicked");
        } else {
            info!("classifier: worker stopped");
        }
    }
}

// ── Worker thread ─────────────────────────────────────────────

fn serve<P: ImagingPort>(mut pipeline: P, mailbox: &Mailbox) {
    let mut active = false;
    loop {
        match block_on(mailbox.requests.receive()) {
            Request::Activate => match pipeline.activate() {
                Ok(()) => active = true,
                Err(e) => warn!("classifier: activate failed: {}", e),
            },
            Request::Deactivate => {
                if active {
                    if let Err(e) = pipeline.deactivate() {
                        warn!("classifier: deactivate failed: {}", e);
                    }
                    active = false;
                }
            }
            Request::Classify(window) => {
                // Requests only follow an activate, but a failed activate
                // leaves the pipeline down: answer `None` so the handle
                // clears its in-flight slot.
                let result = if active { pipeline.classify(window) } else { None };
                mailbox.results.signal(Outcome { window, result });
            }
            Request::Stop => {
                if active {
                    if let Err(e) = pipeline.deactivate() {
                        warn!("classifier: deactivate on stop failed: {}", e);
                    }
                }
                return;
            }
        }
    }
}
