//! GPIO / peripheral pin assignments for the EnvNode board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Temperature / humidity (DHT11)
// ---------------------------------------------------------------------------

/// DHT11 single-wire data line (open-drain, external pull-up).
pub const DHT_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// CO2 (MH-Z14A)
// ---------------------------------------------------------------------------

/// MH-Z14A PWM output.  1004 ms period, high time encodes concentration.
pub const MHZ_PWM_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// CO (MQ-7), analog (ADC1)
// ---------------------------------------------------------------------------

/// MQ-7 analog output via the load resistor: GPIO 34, which is ADC1
/// channel 6 on the ESP32.
pub const MQ7_ADC_CHANNEL: u32 = 6;
