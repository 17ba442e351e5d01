//! Trimmer potentiometers: round-robin ADC averaging.
//!
//! Two potentiometers set the blink and lock durations.  The sampler walks
//! a fixed sequence forever:
//!
//! ```text
//!  Blinking: [settle] s1 s2 .. sK  → publish avg ─┐
//!  BuzzerLock: [settle] s1 s2 .. sK → publish avg ─┤
//!  ▲──────────────────────────────────────────────┘
//! ```
//!
//! The first conversion after each multiplexer switch is discarded.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: a periodic timer callback performs one conversion on
//! [`Averager::channel`] and feeds it to [`Averager::on_conversion`].
//! On host/test: samples are fed directly.
//!
//! [`Calibration`] is the only part shared with the engine.  Each published
//! reading is a single byte, so the engine may read at any time without
//! locking and sees either the old or the new average.

use core::sync::atomic::{AtomicU8, Ordering};

/// Reading published before the first average completes (mid-scale).
const INITIAL_READING: u8 = 128;

/// Which trimmer a conversion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimmerChannel {
    Blinking,
    BuzzerLock,
}

impl TrimmerChannel {
    /// The channel sampled after this one.
    pub fn next(self) -> Self {
        match self {
            Self::Blinking => Self::BuzzerLock,
            Self::BuzzerLock => Self::Blinking,
        }
    }
}

/// Latest averaged reading per trimmer, 0–255.
#[derive(Debug)]
pub struct Calibration {
    blinking: AtomicU8,
    buzzer_lock: AtomicU8,
}

impl Calibration {
    pub const fn new() -> Self {
        Self {
            blinking: AtomicU8::new(INITIAL_READING),
            buzzer_lock: AtomicU8::new(INITIAL_READING),
        }
    }

    /// `BlinkingDuration` source.
    pub fn blinking(&self) -> u8 {
        self.blinking.load(Ordering::Relaxed)
    }

    /// `BuzzerLockDuration` source.
    pub fn buzzer_lock(&self) -> u8 {
        self.buzzer_lock.load(Ordering::Relaxed)
    }

    pub fn get(&self, channel: TrimmerChannel) -> u8 {
        match channel {
            TrimmerChannel::Blinking => self.blinking(),
            TrimmerChannel::BuzzerLock => self.buzzer_lock(),
        }
    }

    pub fn publish(&self, channel: TrimmerChannel, reading: u8) {
        let slot = match channel {
            TrimmerChannel::Blinking => &self.blinking,
            TrimmerChannel::BuzzerLock => &self.buzzer_lock,
        };
        slot.store(reading, Ordering::Relaxed);
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new()
    }
}

/// Conversion-complete state machine.  Owned by the sampling context; only
/// the published averages are shared.
pub struct Averager<'a> {
    calibration: &'a Calibration,
    steps: u8,
    /// Position within the current channel's `steps + 1` conversions.
    iteration: u8,
    accumulator: u16,
    channel: TrimmerChannel,
}

impl<'a> Averager<'a> {
    /// `steps` is the validated `STROBE_ADC_AVERAGE_STEPS` (1..=31).
    pub fn new(calibration: &'a Calibration, steps: u8) -> Self {
        debug_assert!((1..=31).contains(&steps), "average steps out of range: {steps}");
        Self {
            calibration,
            steps,
            iteration: 0,
            accumulator: 0,
            channel: TrimmerChannel::Blinking,
        }
    }

    /// Channel the next conversion must be taken from.
    pub fn channel(&self) -> TrimmerChannel {
        self.channel
    }

    /// Feed one completed 8-bit conversion.  Returns the channel to convert
    /// next; it differs from the previous one right after a publish.
    pub fn on_conversion(&mut self, raw: u8) -> TrimmerChannel {
        if self.iteration == 0 {
            self.accumulator = 0;
        } else {
            self.accumulator += u16::from(raw);
        }

        if self.iteration == self.steps {
            let average = (self.accumulator / u16::from(self.steps)) as u8;
            self.calibration.publish(self.channel, average);
            self.iteration = 0;
            self.channel = self.channel.next();
        } else {
            self.iteration += 1;
        }
        self.channel
    }
}

/// Reduce a wide conversion to its 8 most significant bits.
pub fn to_8bit(raw: u16, bitwidth: u32) -> u8 {
    if bitwidth <= 8 {
        return raw.min(u16::from(u8::MAX)) as u8;
    }
    (raw >> (bitwidth - 8)).min(u16::from(u8::MAX)) as u8
}
