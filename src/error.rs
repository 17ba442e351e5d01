//! Error types for the strobe firmware.
//!
//! The poll loop has no runtime error channel: every input it sees is total
//! over its domain.  What can go wrong is either a bad build configuration,
//! rejected at compile time through [`ConfigError`], or a peripheral that
//! fails to come up at boot, reported through [`Error`].

use core::fmt;

use crate::app::ports::OutputChannel;

// ---------------------------------------------------------------------------
// Build-time configuration errors
// ---------------------------------------------------------------------------

/// A rejected build option or option combination.
///
/// Produced by [`BuildConfig::validate`](crate::config::BuildConfig::validate),
/// which runs in a `const` item so that an invalid build never links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `STROBE_CPU_HZ` is zero.
    ClockRate,
    /// `STROBE_TICK_HZ` outside `1..=256`.
    TickRate,
    /// `STROBE_TIMER_PRESCALER` is zero.
    Prescaler,
    /// The prescaled clock is slower than the tick rate, so a tick period
    /// would be shorter than one timer count.
    PeriodUnderflow,
    /// `compare + remainder` does not fit the 16-bit compare register.
    CounterOverflow,
    /// `STROBE_ADC_AVERAGE_STEPS` outside `1..=31`.
    AverageSteps,
    /// `STROBE_MAX_BLINKING_SECS` outside `1..=255`.
    BlinkingDuration,
    /// `STROBE_MAX_LOCK_TEN_SECS` outside `1..=255`.
    LockDuration,
    /// `STROBE_MAX_LOCK_TEN_SECS * 10` exceeds the trimmer scale, which makes
    /// the integer lock divisor zero.
    LockDivisorZero,
}

impl ConfigError {
    /// Human-readable description, usable in `const` panics.
    pub const fn message(self) -> &'static str {
        match self {
            Self::ClockRate => "STROBE_CPU_HZ must be at least 1",
            Self::TickRate => {
                "STROBE_TICK_HZ must be in the range 1..=256 (8-bit sub-second divider)"
            }
            Self::Prescaler => "STROBE_TIMER_PRESCALER must be at least 1",
            Self::PeriodUnderflow => {
                "STROBE_CPU_HZ / STROBE_TIMER_PRESCALER must be at least STROBE_TICK_HZ"
            }
            Self::CounterOverflow => {
                "configuration would overflow the 16-bit timer compare register; \
                 increase STROBE_TICK_HZ or STROBE_TIMER_PRESCALER"
            }
            Self::AverageSteps => "STROBE_ADC_AVERAGE_STEPS must be in the range 1..=31",
            Self::BlinkingDuration => "STROBE_MAX_BLINKING_SECS must be in the range 1..=255",
            Self::LockDuration => "STROBE_MAX_LOCK_TEN_SECS must be in the range 1..=255",
            Self::LockDivisorZero => {
                "STROBE_MAX_LOCK_TEN_SECS * 10 must not exceed the trimmer scale (256)"
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Boot-path failures.  The control loop itself never returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Writing a digital output failed.
    Output(OutputChannel),
    /// Build configuration rejected (only reachable from tests; real builds
    /// fail to compile instead).
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Output(ch) => write!(f, "output: {ch:?} write failed"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
