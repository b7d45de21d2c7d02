//! SortBin firmware entry point.
//!
//! Motion-triggered waste classification station on the ESP32-S3.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter     NoCamera       LogStatusSink  LogEventSink│
//! │  (Sensor+Illum.)     (ImagingPort)  (StatusSink)   (EventSink) │
//! │  MonotonicClock      BuiltinConfig                             │
//! │  (TimePort)          (ConfigPort)                              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Orchestrator (pure logic)                 │    │
//! │  │  Debounce · Health · Illumination · Imaging windows    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  ControlLoop (fixed rate, watchdog fed every tick)             │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use sortbin::adapters::config_file::{BuiltinConfig, load_config};
use sortbin::adapters::hardware::HardwareAdapter;
use sortbin::adapters::imaging::NoCamera;
use sortbin::adapters::log_sink::{LogEventSink, LogStatusSink};
use sortbin::adapters::time::MonotonicClock;
use sortbin::config::SystemConfig;
use sortbin::drivers::hw_init::{self, GpioInput, GpioOutput, RomDelay};
use sortbin::drivers::illumination::IlluminationDriver;
use sortbin::drivers::watchdog::Watchdog;
use sortbin::pins;
use sortbin::runtime::{ControlLoop, Shutdown};
use sortbin::sensors::SensorHub;
use sortbin::sensors::distance::Hcsr04;
use sortbin::sensors::light::Ldr;

/// Nothing on the device requests a stop today; the loop runs until reset.
static SHUTDOWN: Shutdown = Shutdown::new();

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SortBin v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        log::error!("HAL init failed: {}", e);
        anyhow::bail!("peripheral init failed: {}", e);
    }

    // ── 3. Configuration ──────────────────────────────────────
    let config = match load_config(&BuiltinConfig) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config invalid ({}), using defaults", e);
            SystemConfig::default()
        }
    };
    info!(
        "Config: motion<{}cm, light {}ms @{}%, imaging {}ms, tick {}ms",
        config.motion_threshold_cm,
        config.illumination_duration_ms,
        config.illumination_brightness_percent,
        config.imaging_duration_ms,
        config.tick_interval_ms
    );

    // ── 4. Construct adapters ─────────────────────────────────
    let clock = MonotonicClock::new();
    let sensor_hub = SensorHub::new(
        Hcsr04::new(
            GpioOutput(pins::ULTRASONIC_TRIGGER_GPIO),
            GpioInput(pins::ULTRASONIC_ECHO_GPIO),
            RomDelay,
            clock,
        ),
        Ldr::new(GpioInput(pins::LDR_GPIO)),
    );
    let hw = HardwareAdapter::new(
        sensor_hub,
        IlluminationDriver::new(config.illumination_brightness_percent),
    );

    let mut status = LogStatusSink::new();
    status.splash();

    let watchdog = Watchdog::new(config.tick_interval_ms);

    // ── 5. Control loop ───────────────────────────────────────
    info!("System ready. Entering control loop.");
    let mut control = ControlLoop::new(
        config,
        hw,
        NoCamera::new(),
        status,
        LogEventSink::new(),
        clock,
    )
    .with_watchdog(watchdog);

    let stats = control.run(&SHUTDOWN);
    info!(
        "Control loop exited after {} ticks ({} overruns)",
        stats.ticks, stats.overruns
    );
    Ok(())
}
