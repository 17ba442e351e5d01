//! Build-time configuration.
//!
//! Every tunable of the device is fixed when the firmware is compiled.
//! Values come from `STROBE_*` environment variables (see `build.rs`) and
//! fall back to the defaults below.  [`BuildConfig::validate`] is a
//! `const fn`; [`TIMING`] forces it to run during compilation, so an
//! out-of-range option or an overflowing timer division is a build error
//! carrying the [`ConfigError`] message, never a silently clamped value.
//!
//! ```text
//!   STROBE_CPU_HZ / STROBE_TIMER_PRESCALER   = counts per second
//!   counts per second / STROBE_TICK_HZ       = compare + 1   (every tick)
//!   counts per second % STROBE_TICK_HZ       = remainder     (once a second)
//! ```

use crate::drivers::countdown::CountdownValue;
use crate::error::ConfigError;

/// Full-scale value of a trimmer reading (8-bit conversions).
pub const TRIMMER_SCALE: u16 = 256;

/// Largest value the 16-bit compare register can hold.
const COMPARE_MAX: u32 = u16::MAX as u32;

// ---------------------------------------------------------------------------
// Raw options
// ---------------------------------------------------------------------------

/// Raw build options, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildConfig {
    /// Timer source clock in Hz.
    pub cpu_hz: u32,
    /// How often the periodic tick fires per second.
    pub tick_hz: u32,
    /// Hardware prescale factor between the clock and the timer counter.
    pub timer_prescaler: u32,
    /// Conversions averaged per trimmer channel (the settling sample is extra).
    pub average_steps: u32,
    /// Blink duration in seconds with the trimmer at full scale.
    pub max_blinking_secs: u32,
    /// Lock duration in tens of seconds with the trimmer at full scale.
    pub max_lock_ten_secs: u32,
}

impl BuildConfig {
    /// Defaults used when a variable is not set.
    pub const DEFAULT: Self = Self {
        cpu_hz: 1_000_000,
        tick_hz: 256,
        timer_prescaler: 1,
        average_steps: 3,
        max_blinking_secs: 30,
        max_lock_ten_secs: 2,
    };

    /// Read the options from the compile-time environment.
    pub const fn from_env() -> Self {
        let d = Self::DEFAULT;
        Self {
            cpu_hz: parse_option(option_env!("STROBE_CPU_HZ"), d.cpu_hz),
            tick_hz: parse_option(option_env!("STROBE_TICK_HZ"), d.tick_hz),
            timer_prescaler: parse_option(option_env!("STROBE_TIMER_PRESCALER"), d.timer_prescaler),
            average_steps: parse_option(option_env!("STROBE_ADC_AVERAGE_STEPS"), d.average_steps),
            max_blinking_secs: parse_option(
                option_env!("STROBE_MAX_BLINKING_SECS"),
                d.max_blinking_secs,
            ),
            max_lock_ten_secs: parse_option(
                option_env!("STROBE_MAX_LOCK_TEN_SECS"),
                d.max_lock_ten_secs,
            ),
        }
    }

    /// Range-check every option and derive the timer division and the
    /// trimmer duration scale.
    pub const fn validate(&self) -> Result<Timing, ConfigError> {
        if self.cpu_hz == 0 {
            return Err(ConfigError::ClockRate);
        }
        if self.tick_hz < 1 || self.tick_hz > 256 {
            return Err(ConfigError::TickRate);
        }
        if self.timer_prescaler == 0 {
            return Err(ConfigError::Prescaler);
        }
        if self.average_steps < 1 || self.average_steps > 31 {
            return Err(ConfigError::AverageSteps);
        }
        if self.max_blinking_secs < 1 || self.max_blinking_secs > 255 {
            return Err(ConfigError::BlinkingDuration);
        }
        if self.max_lock_ten_secs < 1 || self.max_lock_ten_secs > 255 {
            return Err(ConfigError::LockDuration);
        }

        let lock_span = self.max_lock_ten_secs * 10;
        if lock_span > TRIMMER_SCALE as u32 {
            return Err(ConfigError::LockDivisorZero);
        }

        let counts_per_second = self.cpu_hz / self.timer_prescaler;
        if counts_per_second < self.tick_hz {
            return Err(ConfigError::PeriodUnderflow);
        }
        let compare = counts_per_second / self.tick_hz - 1;
        let remainder = counts_per_second % self.tick_hz;
        if compare + remainder > COMPARE_MAX {
            return Err(ConfigError::CounterOverflow);
        }

        Ok(Timing {
            division: TimerDivision {
                compare: compare as u16,
                remainder: remainder as u16,
                ticks_per_second: self.tick_hz as u16,
            },
            scale: DurationScale {
                blinking_divisor: TRIMMER_SCALE / self.max_blinking_secs as u16,
                lock_divisor: TRIMMER_SCALE / lock_span as u16,
            },
            average_steps: self.average_steps as u8,
        })
    }
}

/// Parse a decimal build option; absent means `default`.
const fn parse_option(raw: Option<&str>, default: u32) -> u32 {
    let Some(text) = raw else {
        return default;
    };
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        panic!("STROBE_* build options must not be empty");
    }
    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            panic!("STROBE_* build options must be plain decimal integers");
        }
        value = match value.checked_mul(10) {
            Some(v) => match v.checked_add((b - b'0') as u32) {
                Some(v) => v,
                None => panic!("STROBE_* build option does not fit in 32 bits"),
            },
            None => panic!("STROBE_* build option does not fit in 32 bits"),
        };
        i += 1;
    }
    value
}

// ---------------------------------------------------------------------------
// Derived, validated timing
// ---------------------------------------------------------------------------

/// Compare values for the periodic tick source.
///
/// Each period lasts `compare + 1` timer counts.  The period that follows a
/// whole-second boundary is stretched by `remainder` counts so that one
/// second is exactly `cpu_hz / timer_prescaler` counts and no drift builds
/// up over long countdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerDivision {
    pub compare: u16,
    pub remainder: u16,
    pub ticks_per_second: u16,
}

impl TimerDivision {
    /// Compare value to load for the next period.
    pub const fn next_compare(&self, after_second: bool) -> u16 {
        if after_second {
            self.compare + self.remainder
        } else {
            self.compare
        }
    }

    /// Timer counts in one full second of ticks.
    pub const fn counts_per_second(&self) -> u32 {
        self.ticks_per_second as u32 * (self.compare as u32 + 1) + self.remainder as u32
    }
}

/// Linear mapping from a trimmer reading to a countdown duration.
///
/// Both divisors use integer division against [`TRIMMER_SCALE`]; the lock
/// divisor is computed against the span in seconds (`tens * 10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationScale {
    pub blinking_divisor: u16,
    pub lock_divisor: u16,
}

impl DurationScale {
    /// Blink duration for a `BlinkingDuration` trimmer reading.
    pub const fn blinking(&self, reading: u8) -> CountdownValue {
        CountdownValue::from_secs(reading as u16 / self.blinking_divisor)
    }

    /// Lock duration for a `BuzzerLockDuration` trimmer reading.
    pub const fn buzzer_lock(&self, reading: u8) -> CountdownValue {
        CountdownValue::from_secs(reading as u16 / self.lock_divisor)
    }
}

/// Everything the firmware derives from the build options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub division: TimerDivision,
    pub scale: DurationScale,
    pub average_steps: u8,
}

/// Options this firmware image was built with.
pub const BUILD: BuildConfig = BuildConfig::from_env();

/// Validated timing for this image.  Evaluated at compile time.
pub const TIMING: Timing = match BUILD.validate() {
    Ok(timing) => timing,
    Err(e) => panic!("{}", e.message()),
};
