//! Shared handles threaded through the engine.
//!
//! `FsmContext` is how the engine reaches the three asynchronously written
//! components.  Each one has exactly one interrupt-side producer and the
//! engine as its consumer; the same `&'a` handles are given to whatever
//! registers the interrupts.

use crate::config::DurationScale;
use crate::drivers::button::ButtonLatch;
use crate::drivers::countdown::Countdown;
use crate::sensors::trimmer::Calibration;

#[derive(Clone, Copy)]
pub struct FsmContext<'a> {
    /// Written by the button edge ISR.
    pub latch: &'a ButtonLatch,
    /// Written by the periodic timer ISR.
    pub countdown: &'a Countdown,
    /// Written by the trimmer sampler.
    pub calibration: &'a Calibration,
    /// Trimmer reading → duration mapping.
    pub scale: DurationScale,
}

impl<'a> FsmContext<'a> {
    pub fn new(
        latch: &'a ButtonLatch,
        countdown: &'a Countdown,
        calibration: &'a Calibration,
        scale: DurationScale,
    ) -> Self {
        Self {
            latch,
            countdown,
            calibration,
            scale,
        }
    }
}
