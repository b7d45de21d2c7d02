//! Status screen layout for the 128×64 SSD1306.
//!
//! Text only: up to five lines of at most [`LINE_WIDTH`] characters, which
//! is what fits the panel with the default 6×8 font.  The panel driver (or
//! the log sink on the host) just prints the lines top to bottom.
//!
//! ```text
//!  ┌─────────────────────┐
//!  │     CLASSIFIER      │
//!  │Type: PLASTIC        │   or    │     WAITING...      │
//!  │Conf: 93.0%          │
//!  │CAM: ACTIVE LED: ON  │
//!  │OBJ: YES  DARK       │
//!  └─────────────────────┘
//! ```

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::app::status::{StatusNotice, StatusRecord};
use crate::health::SensorKind;
use crate::sensors::LightLevel;

pub const LINE_WIDTH: usize = 21;
pub const MAX_LINES: usize = 5;

pub type Line = String<LINE_WIDTH>;

/// One full screen of text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusScreen {
    lines: Vec<Line, MAX_LINES>,
}

impl StatusScreen {
    /// Lay out the regular status page.
    pub fn layout(record: &StatusRecord) -> Self {
        let mut screen = Self::default();
        screen.push(centred("CLASSIFIER"));

        match &record.last_result {
            Some(result) => {
                screen.push(line(format_args!("Type: {}", result.label)));
                screen.push(line(format_args!("Conf: {:.1}%", result.confidence_percent())));
            }
            None => screen.push(centred("WAITING...")),
        }

        screen.push(line(format_args!(
            "CAM: {} LED: {}",
            if record.imaging { "ACTIVE" } else { "IDLE" },
            if record.illumination { "ON" } else { "OFF" },
        )));
        screen.push(line(format_args!(
            "OBJ: {:<4} {}",
            if record.motion { "YES" } else { "NO" },
            match record.light {
                LightLevel::Dark => "DARK",
                LightLevel::Bright => "BRIGHT",
            },
        )));
        screen
    }

    /// Boot splash shown until the first tick renders.
    pub fn startup() -> Self {
        let mut screen = Self::default();
        screen.push(centred("WASTE"));
        screen.push(centred("CLASSIFIER"));
        screen.push(centred("Starting..."));
        screen
    }

    /// Single-line banner for a sensor notice.
    pub fn notice(notice: &StatusNotice) -> Line {
        let (kind, state) = match notice {
            StatusNotice::SensorDegraded(kind) => (kind, "FAULT"),
            StatusNotice::SensorRecovered(kind) => (kind, "OK"),
        };
        let name = match kind {
            SensorKind::Distance => "DIST",
            SensorKind::Light => "LIGHT",
        };
        line(format_args!("{} SENSOR {}", name, state))
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    fn push(&mut self, l: Line) {
        // Layouts above never exceed MAX_LINES.
        let _ = self.lines.push(l);
    }
}

impl fmt::Display for StatusScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, l) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            f.write_str(l.trim())?;
        }
        Ok(())
    }
}

// ── Line helpers ──────────────────────────────────────────────

/// `fmt::Write` into a fixed line, silently dropping what does not fit.
struct Truncating<'a>(&'a mut Line);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

fn line(args: fmt::Arguments<'_>) -> Line {
    let mut l = Line::new();
    // Truncating never returns an error.
    let _ = Truncating(&mut l).write_fmt(args);
    l
}

fn centred(text: &str) -> Line {
    let pad = LINE_WIDTH.saturating_sub(text.chars().count()) / 2;
    line(format_args!("{:pad$}{}", "", text, pad = pad))
}
