//! GPIO / peripheral pin assignments for the SortBin station board.
//!
//! Drivers and `main` reference these constants instead of hard-coding pin
//! numbers.

// ---------------------------------------------------------------------------
// HC-SR04 ultrasonic ranger
// ---------------------------------------------------------------------------

/// Digital output: 10 µs HIGH pulse starts a measurement.
pub const ULTRASONIC_TRIGGER_GPIO: i32 = 4;
/// Digital input: HIGH for the echo round-trip time.
/// Behind a 5 V → 3.3 V divider on the board.
pub const ULTRASONIC_ECHO_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Ambient light
// ---------------------------------------------------------------------------

/// LDR comparator module, digital output.  HIGH = dark.
pub const LDR_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Illumination (white LED strip through a logic-level MOSFET)
// ---------------------------------------------------------------------------

/// Digital output: strip supply enable (active HIGH).
pub const ILLUMINATION_ENABLE_GPIO: i32 = 7;
/// LEDC PWM output for strip brightness.
pub const ILLUMINATION_PWM_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for the LED strip (1 kHz, flicker-free on camera at 30 fps).
pub const ILLUMINATION_PWM_FREQ_HZ: u32 = 1_000;
