//! Consecutive-sample debounce for the dark/bright decision.
//!
//! The light sensor reports one raw sample per tick.  A change of level is
//! only accepted after `ticks` identical samples in a row; with `ticks == 1`
//! every sample is accepted immediately.

use log::debug;

use crate::sensors::LightLevel;

#[derive(Debug, Clone)]
pub struct LightDebounce {
    ticks: u8,
    stable: LightLevel,
    candidate: LightLevel,
    streak: u8,
}

impl LightDebounce {
    /// `initial` is the level assumed before the first sample.
    pub fn new(ticks: u8, initial: LightLevel) -> Self {
        Self {
            ticks: ticks.max(1),
            stable: initial,
            candidate: initial,
            streak: 0,
        }
    }

    pub fn level(&self) -> LightLevel {
        self.stable
    }

    /// Feed one raw sample, return the debounced level.
    pub fn update(&mut self, raw: LightLevel) -> LightLevel {
        if raw == self.stable {
            self.candidate = raw;
            self.streak = 0;
            return self.stable;
        }

        if raw == self.candidate {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.candidate = raw;
            self.streak = 1;
        }

        if self.streak >= self.ticks {
            debug!("light: {:?} -> {:?}", self.stable, raw);
            self.stable = raw;
            self.streak = 0;
        }
        self.stable
    }
}
