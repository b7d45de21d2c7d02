//! Fuzz target: JSON configuration parsing
//!
//! Arbitrary bytes go through the same path as a config file: parse into
//! `SystemConfig` (missing fields default) and validate.  Whatever passes
//! validation must be usable to build an orchestrator.
//!
//! cargo fuzz run fuzz_config

#![no_main]

use libfuzzer_sys::fuzz_target;
use sortbin::app::orchestrator::Orchestrator;
use sortbin::config::SystemConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<SystemConfig>(data) else {
        return;
    };
    if config.validate().is_err() {
        return;
    }

    assert!(config.sensor_timeout() < config.tick_interval());
    assert!((1..=100).contains(&config.illumination_brightness_percent));
    let orch = Orchestrator::new(config);
    assert!(!orch.status().imaging);
});
