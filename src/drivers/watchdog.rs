//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the device if the control loop stalls.  The loop feeds it once
//! per tick; the timeout is a multiple of the tick interval so a single
//! slow classification or sensor read never trips it.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

/// Ticks that may be missed before the TWDT fires.
const MISSED_TICK_BUDGET: u32 = 25;
const MIN_TIMEOUT_MS: u32 = 5_000;

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Configure the TWDT for `tick_interval_ms` and subscribe the calling task.
    pub fn new(tick_interval_ms: u32) -> Self {
        let timeout_ms = tick_interval_ms
            .saturating_mul(MISSED_TICK_BUDGET)
            .max(MIN_TIMEOUT_MS);

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: TWDT API calls from the main task during startup.
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!("watchdog: reconfigure returned {} (already running?)", ret);
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    info!("watchdog: subscribed ({}ms timeout)", timeout_ms);
                } else {
                    log::warn!("watchdog: failed to subscribe ({})", ret);
                }

                Self {
                    timeout_ms,
                    subscribed,
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            info!("watchdog(sim): no-op ({}ms timeout)", timeout_ms);
            Self { timeout_ms }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Feed the watchdog. Called once per control tick.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: resets the current task's TWDT entry only.
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}
