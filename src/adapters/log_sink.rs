//! Log-based sink adapters.
//!
//! [`LogEventSink`] implements [`EventSink`] by writing structured
//! application events to the logger (UART / USB-CDC on the device, stderr
//! in the simulation).  [`LogStatusSink`] implements [`StatusSink`] by
//! logging the laid-out status screen, but only when its text changes, so
//! a quiet station produces a quiet log.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, RenderError, StatusSink};
use crate::app::status::{StatusNotice, StatusRecord};
use crate::display::StatusScreen;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | all resources off");
            }
            AppEvent::IlluminationChanged { on } => {
                info!("STATE | illumination {}", if *on { "ON" } else { "OFF" });
            }
            AppEvent::ImagingChanged { active, window } => {
                info!(
                    "STATE | imaging {} (window {})",
                    if *active { "ACTIVE" } else { "IDLE" },
                    window
                );
            }
            AppEvent::Classified(result) => {
                info!("CLASSIFY | {}", result);
            }
            AppEvent::Released => {
                info!("STOP | resources released");
            }
        }
    }
}

/// Status display stand-in that prints the screen to the log.
#[derive(Debug, Default)]
pub struct LogStatusSink {
    last: Option<StatusScreen>,
    renders: u32,
}

impl LogStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log the boot splash.
    pub fn splash(&mut self) {
        let screen = StatusScreen::startup();
        info!("SCREEN | {}", screen);
        self.last = Some(screen);
    }

    /// Number of screens actually written (changes only).
    pub fn renders(&self) -> u32 {
        self.renders
    }
}

impl StatusSink for LogStatusSink {
    fn render(&mut self, record: &StatusRecord) -> Result<(), RenderError> {
        let screen = StatusScreen::layout(record);
        if self.last.as_ref() != Some(&screen) {
            info!("SCREEN | {}", screen);
            self.last = Some(screen);
            self.renders += 1;
        }
        Ok(())
    }

    fn notify(&mut self, notice: &StatusNotice) -> Result<(), RenderError> {
        let banner = StatusScreen::notice(notice);
        match notice {
            StatusNotice::SensorDegraded(_) => warn!("SCREEN | {}", banner),
            StatusNotice::SensorRecovered(_) => info!("SCREEN | {}", banner),
        }
        Ok(())
    }
}
