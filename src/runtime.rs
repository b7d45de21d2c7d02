//! Fixed-rate control loop and shutdown handling.
//!
//! ```text
//!   ┌─────────────── tick_interval_ms ───────────────┐
//!   │ step(): sample → decide → actuate → render │ sleep(remaining) │
//!   └────────────────────────────────────────────────┘
//!                                                  ▲
//!                               the only suspension / cancellation point
//! ```
//!
//! [`ControlLoop`] owns the orchestrator and every port.  A tick is never
//! interrupted: [`Shutdown`] is only observed inside [`Shutdown::sleep`].
//! When the loop ends, or the `ControlLoop` is dropped on any other path
//! (early return, panic unwinding), both resources are released.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use std::time::Instant;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use futures_lite::future::{block_on, or};
use log::{info, warn};

use crate::app::orchestrator::Orchestrator;
use crate::app::ports::{EventSink, IlluminationPort, ImagingPort, SensorPort, StatusSink, TimePort};
use crate::app::status::StatusRecord;
use crate::config::SystemConfig;
use crate::drivers::watchdog::Watchdog;

// ── Shutdown signal ───────────────────────────────────────────

/// Process-wide stop request.  `const`-constructible so it can live in a
/// `static` reachable from a signal handler.
pub struct Shutdown {
    signal: Signal<CriticalSectionRawMutex, ()>,
    requested: AtomicBool,
}

/// Why [`Shutdown::sleep`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Elapsed,
    Shutdown,
}

impl Shutdown {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
            requested: AtomicBool::new(false),
        }
    }

    /// Request a stop.  Safe to call from any thread, any number of times.
    pub fn trigger(&self) {
        self.requested.store(true, Ordering::Release);
        self.signal.signal(());
    }

    pub fn is_triggered(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Sleep for `duration` unless a stop is requested first.
    pub fn sleep(&self, duration: Duration) -> Wake {
        if self.is_triggered() {
            return Wake::Shutdown;
        }
        block_on(or(
            async {
                self.signal.wait().await;
                Wake::Shutdown
            },
            async {
                async_io_mini::Timer::after(duration).await;
                Wake::Elapsed
            },
        ))
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

// ── Loop statistics ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    /// Ticks whose work alone took longer than the tick interval.
    pub overruns: u64,
    pub worst_tick: Duration,
}

// ── Control loop ──────────────────────────────────────────────

pub struct ControlLoop<H, I, S, E, T>
where
    H: SensorPort + IlluminationPort,
    I: ImagingPort,
    S: StatusSink,
    E: EventSink,
    T: TimePort,
{
    orchestrator: Orchestrator,
    hw: H,
    imaging: I,
    status: S,
    events: E,
    clock: T,
    watchdog: Option<Watchdog>,
    stats: LoopStats,
    started: bool,
}

impl<H, I, S, E, T> ControlLoop<H, I, S, E, T>
where
    H: SensorPort + IlluminationPort,
    I: ImagingPort,
    S: StatusSink,
    E: EventSink,
    T: TimePort,
{
    pub fn new(config: SystemConfig, hw: H, imaging: I, status: S, events: E, clock: T) -> Self {
        Self {
            orchestrator: Orchestrator::new(config),
            hw,
            imaging,
            status,
            events,
            clock,
            watchdog: None,
            stats: LoopStats::default(),
            started: false,
        }
    }

    /// Feed `watchdog` once per tick.
    pub fn with_watchdog(mut self, watchdog: Watchdog) -> Self {
        self.watchdog = Some(watchdog);
        self
    }

    /// Run exactly one tick.
    pub fn step(&mut self) -> StatusRecord {
        if !self.started {
            self.orchestrator.start(&mut self.events);
            self.started = true;
        }

        let began = Instant::now();
        let now_ms = self.clock.now_ms();
        let record = self.orchestrator.tick(
            now_ms,
            &mut self.hw,
            &mut self.imaging,
            &mut self.status,
            &mut self.events,
        );
        if let Some(wd) = &self.watchdog {
            wd.feed();
        }

        let took = began.elapsed();
        self.stats.ticks += 1;
        self.stats.worst_tick = self.stats.worst_tick.max(took);
        record
    }

    /// Tick at `tick_interval_ms` until `shutdown` fires, then release.
    pub fn run(&mut self, shutdown: &Shutdown) -> LoopStats {
        let interval = self.orchestrator.config().tick_interval();
        info!("control loop: running every {}ms", interval.as_millis());

        loop {
            let began = Instant::now();
            self.step();
            let took = began.elapsed();

            if took > interval {
                self.stats.overruns += 1;
                warn!(
                    "control loop: tick {} overran ({}ms > {}ms)",
                    self.stats.ticks,
                    took.as_millis(),
                    interval.as_millis()
                );
            }

            if shutdown.sleep(interval.saturating_sub(took)) == Wake::Shutdown {
                info!("control loop: shutdown requested");
                break;
            }
        }

        self.release();
        self.stats
    }

    /// Switch every resource off.  Idempotent; also runs on drop.
    pub fn release(&mut self) {
        self.orchestrator
            .release(&mut self.hw, &mut self.imaging, &mut self.events);
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    pub fn hw(&self) -> &H {
        &self.hw
    }

    pub fn imaging(&self) -> &I {
        &self.imaging
    }

    pub fn status_sink(&self) -> &S {
        &self.status
    }

    pub fn events(&self) -> &E {
        &self.events
    }
}

impl<H, I, S, E, T> Drop for ControlLoop<H, I, S, E, T>
where
    H: SensorPort + IlluminationPort,
    I: ImagingPort,
    S: StatusSink,
    E: EventSink,
    T: TimePort,
{
    fn drop(&mut self) {
        self.release();
    }
}
