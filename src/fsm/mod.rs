//! Timed resource lifecycles.
//!
//! Both auxiliary resources (the LED strip and the camera pipeline) follow
//! the same two-state machine:
//!
//! ```text
//!            condition                        condition
//!     ┌─────┐ ───────▶ ┌────────────────┐ ◀──────────┐ (restart window,
//!     │ Off │          │ On(window)     │ ───────────┘  no command)
//!     └─────┘ ◀─────── └────────────────┘
//!          !condition && now >= started_at + duration
//! ```
//!
//! [`Lifecycle::update`] is called once per tick with the already-evaluated
//! condition.  The condition is checked **before** expiry, so a tick that
//! both qualifies and falls on the expiry instant keeps the resource on.
//! Only the two edges are reported; the caller issues exactly one hardware
//! command per [`Edge`] and nothing while a state holds.

pub mod debounce;

use log::debug;

/// Monotonically increasing activation window id (per lifecycle).
pub type WindowId = u32;

// ---------------------------------------------------------------------------
// Activation window
// ---------------------------------------------------------------------------

/// Remaining grant of "on" time for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationWindow {
    pub id: WindowId,
    pub started_at_ms: u64,
    pub duration_ms: u64,
}

impl ActivationWindow {
    pub const fn new(id: WindowId, started_at_ms: u64, duration_ms: u64) -> Self {
        Self {
            id,
            started_at_ms,
            duration_ms,
        }
    }

    pub fn expires_at_ms(&self) -> u64 {
        self.started_at_ms.saturating_add(self.duration_ms)
    }

    /// `now < started_at + duration`.
    pub fn is_active(&self, now_ms: u64) -> bool {
        now_ms < self.expires_at_ms()
    }

    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.expires_at_ms().saturating_sub(now_ms)
    }

    /// Restart from `now`.  The window is re-measured, never extended by
    /// the leftover time.
    fn restart(&mut self, now_ms: u64, duration_ms: u64) {
        self.started_at_ms = now_ms;
        self.duration_ms = duration_ms;
    }
}

// ---------------------------------------------------------------------------
// Lifecycle state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Off,
    On(ActivationWindow),
}

/// A state change that requires exactly one hardware command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// `Off → On`; carries the freshly opened window.
    Activated(ActivationWindow),
    /// `On → Off`; carries the window that just closed.
    Deactivated(ActivationWindow),
}

#[derive(Debug, Clone)]
pub struct Lifecycle {
    name: &'static str,
    phase: Phase,
    last_id: WindowId,
}

impl Lifecycle {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            phase: Phase::Off,
            last_id: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_on(&self) -> bool {
        matches!(self.phase, Phase::On(_))
    }

    pub fn window(&self) -> Option<&ActivationWindow> {
        match &self.phase {
            Phase::On(w) => Some(w),
            Phase::Off => None,
        }
    }

    /// Advance one tick.
    ///
    /// * condition true, `Off` → opens window `last_id + 1`, returns `Activated`.
    /// * condition true, `On` → restarts the window at `now_ms`, returns `None`.
    /// * condition false, `On`, window expired → returns `Deactivated`.
    /// * otherwise → no change.
    pub fn update(&mut self, condition: bool, now_ms: u64, duration_ms: u64) -> Option<Edge> {
        if condition {
            if let Phase::On(window) = &mut self.phase {
                window.restart(now_ms, duration_ms);
                return None;
            }
            self.last_id = self.last_id.wrapping_add(1);
            let window = ActivationWindow::new(self.last_id, now_ms, duration_ms);
            self.phase = Phase::On(window);
            debug!("{}: window {} opened at {}ms", self.name, window.id, now_ms);
            return Some(Edge::Activated(window));
        }

        match self.phase {
            Phase::On(window) if !window.is_active(now_ms) => {
                self.phase = Phase::Off;
                debug!("{}: window {} expired at {}ms", self.name, window.id, now_ms);
                Some(Edge::Deactivated(window))
            }
            _ => None,
        }
    }

    /// Close the current window regardless of its remaining time.
    /// Returns the closed window, or `None` if already off.
    pub fn force_off(&mut self) -> Option<ActivationWindow> {
        match core::mem::replace(&mut self.phase, Phase::Off) {
            Phase::On(window) => Some(window),
            Phase::Off => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
