//! Minutes/seconds countdown driven by the periodic timer interrupt.
//!
//! The tick source fires [`TimerDivision::ticks_per_second`] times a second.
//! [`Countdown::on_timer_tick`] divides that down to whole seconds and
//! returns the compare value for the next period, stretching the period that
//! follows each second boundary by the division remainder.
//!
//! On each second the seconds field is decremented; when it would reach
//! zero a minute is borrowed and seconds restart at **60** (not 59).  The
//! borrow takes the place of the zero second, so `(1, 10)` still runs for
//! exactly 70 seconds.  With no minutes left the countdown disarms itself
//! and ignores further ticks until [`Countdown::arm`].
//!
//! All fields are single-word atomics: the ISR is the only writer while
//! armed, the engine writes only in `arm()`.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, Ordering};

use crate::config::TimerDivision;

/// A `(minutes, seconds)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountdownValue {
    pub minutes: u8,
    pub seconds: u8,
}

impl CountdownValue {
    /// Split a duration in seconds into minutes and seconds.
    pub const fn from_secs(secs: u16) -> Self {
        Self {
            minutes: (secs / 60) as u8,
            seconds: (secs % 60) as u8,
        }
    }

    pub const fn total_secs(self) -> u16 {
        self.minutes as u16 * 60 + self.seconds as u16
    }
}

pub struct Countdown {
    minutes: AtomicU8,
    seconds: AtomicU8,
    armed: AtomicBool,
    /// Ticks left in the current second.
    divider: AtomicU16,
    division: TimerDivision,
}

impl Countdown {
    pub const fn new(division: TimerDivision) -> Self {
        Self {
            minutes: AtomicU8::new(0),
            seconds: AtomicU8::new(0),
            armed: AtomicBool::new(false),
            divider: AtomicU16::new(division.ticks_per_second),
            division,
        }
    }

    /// Load a duration and start counting.  The first second is a full one.
    pub fn arm(&self, minutes: u8, seconds: u8) {
        self.divider.store(self.division.ticks_per_second, Ordering::Relaxed);
        self.seconds.store(seconds, Ordering::Relaxed);
        self.minutes.store(minutes, Ordering::Relaxed);
        self.armed.store(true, Ordering::Release);
    }

    /// The countdown is running.
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Current `(minutes, seconds)`.
    pub fn remaining(&self) -> CountdownValue {
        CountdownValue {
            minutes: self.minutes.load(Ordering::Relaxed),
            seconds: self.seconds.load(Ordering::Relaxed),
        }
    }

    pub fn division(&self) -> TimerDivision {
        self.division
    }

    /// Periodic timer ISR handler.  Returns the compare value to load for
    /// the next period.
    pub fn on_timer_tick(&self) -> u16 {
        if !self.is_armed() {
            return self.division.compare;
        }
        let left = self.divider.load(Ordering::Relaxed).saturating_sub(1);
        if left == 0 {
            self.divider.store(self.division.ticks_per_second, Ordering::Relaxed);
            self.elapse_second();
            self.division.next_compare(true)
        } else {
            self.divider.store(left, Ordering::Relaxed);
            self.division.next_compare(false)
        }
    }

    /// Count one wall-clock second.  No-op while disarmed.
    pub fn elapse_second(&self) {
        if !self.is_armed() {
            return;
        }
        let seconds = self.seconds.load(Ordering::Relaxed);
        if seconds > 1 {
            self.seconds.store(seconds - 1, Ordering::Relaxed);
            return;
        }
        let minutes = self.minutes.load(Ordering::Relaxed);
        if minutes > 0 {
            self.minutes.store(minutes - 1, Ordering::Relaxed);
            self.seconds.store(60, Ordering::Relaxed);
        } else {
            self.seconds.store(0, Ordering::Relaxed);
            self.armed.store(false, Ordering::Release);
        }
    }
}
