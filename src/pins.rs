//! GPIO / ADC assignments for the strobe controller board.
//!
//! Single source of truth: drivers reference these constants rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Buzzer indicator LED, active HIGH.
pub const BUZZER_LED_GPIO: i32 = 4;
/// Relay driver transistor, active HIGH.
pub const RELAY_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Push-button to ground with pull-up; interrupt on the falling edge.
pub const BUTTON_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Trimmers (ADC1)
// ---------------------------------------------------------------------------

/// Blink-duration potentiometer wiper, ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const BLINKING_TRIMMER_ADC_CHANNEL: u32 = 0;
/// Lock-duration potentiometer wiper, ADC1 channel 1 (GPIO 2 on ESP32-S3).
pub const LOCK_TRIMMER_ADC_CHANNEL: u32 = 1;

/// Native ADC resolution; readings are reduced to their 8 most significant
/// bits before averaging.
pub const ADC_BITWIDTH: u32 = 12;

/// Interval between trimmer conversions (µs).
pub const TRIMMER_SAMPLE_PERIOD_US: u64 = 2_000;
