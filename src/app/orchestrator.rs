//! Orchestrator: the station's only cross-tick state.
//!
//! [`Orchestrator`] owns the [`OrchestratorState`], the sensor health
//! watchdog, and the light debounce.  All I/O flows through port traits
//! injected at call sites, so the whole decision path is testable with
//! mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ IlluminationPort
//!                 │       Orchestrator        │ ◀─▶ ImagingPort
//!                 │  health · debounce ·      │ ──▶ StatusSink
//!                 │  illumination · imaging   │ ──▶ EventSink
//!                 └──────────────────────────┘
//! ```
//!
//! ## One tick
//!
//! 1. Sample both sensors (bounded by `sensor_timeout_ms`).
//! 2. Feed the health watchdog; forward any degraded/recovered notice.
//! 3. Debounce the light level, decide `object_present`.
//! 4. Illumination lifecycle on `object_present && Dark`.
//! 5. Imaging lifecycle on `object_present`.
//! 6. While imaging is on and the pipeline accepted `activate`, classify
//!    (throttled by `classify_interval_ms`) and keep the last non-`None`
//!    result.
//! 7. Project the state into a [`StatusRecord`] and render it.
//!
//! Hardware commands are issued only on lifecycle edges.  A failed
//! command is logged and the lifecycle keeps its intended state, so the
//! next edge issues the command again.  A window whose `activate` failed
//! stays open (and is deactivated on expiry) but is never classified.

use log::{debug, info, warn};

use crate::classify::ClassificationResult;
use crate::config::SystemConfig;
use crate::fsm::debounce::LightDebounce;
use crate::fsm::{Edge, Lifecycle};
use crate::health::SensorHealth;
use crate::sensors::LightLevel;

use super::events::AppEvent;
use super::ports::{EventSink, IlluminationPort, ImagingPort, SensorPort, StatusSink};
use super::status::{StatusRecord, project};

// ───────────────────────────────────────────────────────────────
// State
// ───────────────────────────────────────────────────────────────

/// Everything the orchestrator remembers between ticks.
#[derive(Debug, Clone)]
pub struct OrchestratorState {
    /// Debounced ambient light.
    pub light: LightLevel,
    /// `object_present` as decided on the latest tick.
    pub motion: bool,
    pub illumination: Lifecycle,
    pub imaging: Lifecycle,
    /// Kept across `None` frames and across imaging windows.
    pub last_result: Option<ClassificationResult>,
    pub tick: u64,
}

impl OrchestratorState {
    pub fn new() -> Self {
        Self {
            light: LightLevel::Bright,
            motion: false,
            illumination: Lifecycle::new("illumination"),
            imaging: Lifecycle::new("imaging"),
            last_result: None,
            tick: 0,
        }
    }
}

impl Default for OrchestratorState {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Orchestrator
// ───────────────────────────────────────────────────────────────

pub struct Orchestrator {
    state: OrchestratorState,
    config: SystemConfig,
    health: SensorHealth,
    light_filter: LightDebounce,
    last_classify_ms: Option<u64>,
    /// The pipeline accepted `activate` for the current window.
    imaging_ready: bool,
    released: bool,
}

impl Orchestrator {
    /// `config` is expected to be validated already.
    pub fn new(config: SystemConfig) -> Self {
        let health = SensorHealth::new(config.sensor_fault_limit);
        let light_filter = LightDebounce::new(config.light_debounce_ticks, LightLevel::Bright);
        Self {
            state: OrchestratorState::new(),
            config,
            health,
            light_filter,
            last_classify_ms: None,
            imaging_ready: false,
            released: false,
        }
    }

    pub fn start(&mut self, events: &mut impl EventSink) {
        info!(
            "orchestrator: started (threshold {:.0}cm, light {}ms, imaging {}ms)",
            self.config.motion_threshold_cm,
            self.config.illumination_duration_ms,
            self.config.imaging_duration_ms
        );
        events.emit(&AppEvent::Started);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle.  Never fails: sensor and actuator
    /// faults are absorbed here.
    ///
    /// `hw` satisfies both [`SensorPort`] and [`IlluminationPort`], the
    /// way the station's single hardware adapter does.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + IlluminationPort),
        imaging: &mut impl ImagingPort,
        status: &mut impl StatusSink,
        events: &mut impl EventSink,
    ) -> StatusRecord {
        self.state.tick += 1;
        self.released = false;

        // 1–2. Sample and watch sensor health
        let sample = hw.sample(self.config.sensor_timeout());
        for notice in self.health.evaluate(&sample) {
            if let Err(e) = status.notify(&notice) {
                warn!("orchestrator: status notice {:?} not shown: {}", notice, e);
            }
        }

        // 3. Proximity and light decision
        self.state.light = self.light_filter.update(sample.light);
        self.state.motion = sample.distance.is_object_within(self.config.motion_threshold_cm);
        let object_present = self.state.motion;

        // 4. Illumination
        let wants_light = object_present && self.state.light == LightLevel::Dark;
        let edge = self.state.illumination.update(
            wants_light,
            now_ms,
            u64::from(self.config.illumination_duration_ms),
        );
        if let Some(edge) = edge {
            let on = matches!(edge, Edge::Activated(_));
            if let Err(e) = hw.set_active(on) {
                warn!("orchestrator: illumination {} failed: {}", on_off(on), e);
            }
            events.emit(&AppEvent::IlluminationChanged { on });
        }

        // 5. Imaging
        let edge = self.state.imaging.update(
            object_present,
            now_ms,
            u64::from(self.config.imaging_duration_ms),
        );
        match edge {
            Some(Edge::Activated(window)) => {
                self.imaging_ready = match imaging.activate() {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(
                            "orchestrator: imaging activate failed: {}, window {} runs without classification",
                            e, window.id
                        );
                        false
                    }
                };
                self.last_classify_ms = None;
                events.emit(&AppEvent::ImagingChanged {
                    active: true,
                    window: window.id,
                });
            }
            Some(Edge::Deactivated(window)) => {
                self.imaging_ready = false;
                if let Err(e) = imaging.deactivate() {
                    warn!("orchestrator: imaging deactivate failed: {}", e);
                }
                events.emit(&AppEvent::ImagingChanged {
                    active: false,
                    window: window.id,
                });
            }
            None => {}
        }

        // 6. Classification
        self.classify(now_ms, imaging, events);

        // 7. Status
        let record = project(&self.state);
        if let Err(e) = status.render(&record) {
            debug!("orchestrator: render failed: {}", e);
        }
        record
    }

    fn classify(&mut self, now_ms: u64, imaging: &mut impl ImagingPort, events: &mut impl EventSink) {
        let Some(window) = self.state.imaging.window().copied() else {
            return;
        };
        if !self.imaging_ready {
            return;
        }
        if !self.classify_due(now_ms) {
            return;
        }
        debug_assert!(
            self.state.imaging.is_on(),
            "classify outside an imaging window"
        );

        self.last_classify_ms = Some(now_ms);
        if let Some(result) = imaging.classify(window.id) {
            events.emit(&AppEvent::Classified(result.clone()));
            self.state.last_result = Some(result);
        }
    }

    fn classify_due(&self, now_ms: u64) -> bool {
        let interval = u64::from(self.config.classify_interval_ms);
        match self.last_classify_ms {
            None => true,
            Some(_) if interval == 0 => true,
            Some(last) => now_ms.saturating_sub(last) >= interval,
        }
    }

    // ── Shutdown ──────────────────────────────────────────────

    /// Switch both resources off, whatever their windows say.
    ///
    /// Commands go out only for resources that are on; calling this again
    /// (or after a normal expiry) does nothing.
    pub fn release(
        &mut self,
        hw: &mut impl IlluminationPort,
        imaging: &mut impl ImagingPort,
        events: &mut impl EventSink,
    ) {
        if self.released {
            return;
        }

        if self.state.illumination.force_off().is_some() {
            if let Err(e) = hw.set_active(false) {
                warn!("orchestrator: illumination release failed: {}", e);
            }
            events.emit(&AppEvent::IlluminationChanged { on: false });
        }
        self.imaging_ready = false;
        if let Some(window) = self.state.imaging.force_off() {
            if let Err(e) = imaging.deactivate() {
                warn!("orchestrator: imaging release failed: {}", e);
            }
            events.emit(&AppEvent::ImagingChanged {
                active: false,
                window: window.id,
            });
        }

        self.released = true;
        events.emit(&AppEvent::Released);
        info!("orchestrator: resources released after {} ticks", self.state.tick);
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn state(&self) -> &OrchestratorState {
        &self.state
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn health(&self) -> &SensorHealth {
        &self.health
    }

    pub fn status(&self) -> StatusRecord {
        project(&self.state)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
