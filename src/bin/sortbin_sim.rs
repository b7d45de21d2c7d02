//! Host simulation of the SortBin station.
//!
//! Runs the real control loop against scripted peripherals:
//!
//! - an ultrasonic sensor that sees objects on a 40 s schedule (and times
//!   out on every 17th read to exercise sensor health),
//! - a light sensor that is dark for the first half of every 40 s cycle,
//! - a classifier with 600 ms inference latency on its own worker thread.
//!
//! ```text
//! sortbin-sim [config.json]
//! ```
//!
//! `RUST_LOG` controls verbosity (default `info`).  Ctrl-C stops the loop,
//! switches everything off, and prints a summary.

use core::time::Duration;

use anyhow::{Context, Result};
use log::info;

use sortbin::adapters::config_file::{BuiltinConfig, JsonConfigFile, load_config};
use sortbin::adapters::hardware::HardwareAdapter;
use sortbin::adapters::log_sink::{LogEventSink, LogStatusSink};
use sortbin::adapters::sim::{SimDistance, SimLight, SimPipeline};
use sortbin::adapters::time::MonotonicClock;
use sortbin::classify::worker::ClassifierWorker;
use sortbin::drivers::illumination::IlluminationDriver;
use sortbin::runtime::{ControlLoop, Shutdown};
use sortbin::sensors::SensorHub;

static SHUTDOWN: Shutdown = Shutdown::new();

const LIGHT_CYCLE_MS: u64 = 40_000;
const DARK_MS: u64 = 20_000;
const DROPOUT_EVERY: u32 = 17;
const INFERENCE_LATENCY: Duration = Duration::from_millis(600);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            load_config(&JsonConfigFile::new(&path)).with_context(|| format!("loading {}", path))?
        }
        None => load_config(&BuiltinConfig)?,
    };

    ctrlc::set_handler(|| SHUTDOWN.trigger()).context("installing Ctrl-C handler")?;

    let clock = MonotonicClock::new();
    let hw = HardwareAdapter::new(
        SensorHub::new(
            SimDistance::demo(clock).with_dropouts(DROPOUT_EVERY),
            SimLight::new(clock, LIGHT_CYCLE_MS, DARK_MS),
        ),
        IlluminationDriver::new(config.illumination_brightness_percent),
    );
    let worker = ClassifierWorker::spawn(SimPipeline::new(INFERENCE_LATENCY, config.min_confidence))?;

    let mut status = LogStatusSink::new();
    status.splash();

    info!("sortbin-sim v{} (Ctrl-C to stop)", env!("CARGO_PKG_VERSION"));
    let mut control = ControlLoop::new(config, hw, worker, status, LogEventSink::new(), clock);
    let stats = control.run(&SHUTDOWN);

    let worker = control.imaging().stats();
    info!(
        "summary: {} ticks, {} overruns, worst tick {}ms, {} screen updates",
        stats.ticks,
        stats.overruns,
        stats.worst_tick.as_millis(),
        control.status_sink().renders()
    );
    info!(
        "summary: {} classify requests, {} skipped while busy, {} stale results dropped",
        worker.requested, worker.skipped, worker.stale
    );
    Ok(())
}
