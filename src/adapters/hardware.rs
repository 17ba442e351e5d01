//! Hardware adapter: bridges the board to the engine's port traits.
//!
//! Owns the output driver and exposes it through [`OutputPort`]; forwards
//! [`EdgeDetector`] calls to the button interrupt helpers in
//! [`hw_init`](crate::drivers::hw_init).  On non-espidf targets those
//! helpers are no-ops, so the adapter only keeps its own bookkeeping.

use crate::app::ports::{EdgeDetector, Level, OutputChannel, OutputPort};
use crate::drivers::hw_init;

/// Concrete adapter combining the board's outputs and button interrupt.
pub struct HardwareAdapter<O> {
    outputs: O,
    detection_enabled: bool,
    rearms: u32,
}

impl<O: OutputPort> HardwareAdapter<O> {
    /// The button interrupt is enabled by `hw_init` at boot.
    pub fn new(outputs: O) -> Self {
        Self {
            outputs,
            detection_enabled: true,
            rearms: 0,
        }
    }

    /// Whether this adapter last enabled (rather than cleared) detection.
    pub fn detection_enabled(&self) -> bool {
        self.detection_enabled
    }

    /// Times edge detection was turned back on.
    pub fn rearms(&self) -> u32 {
        self.rearms
    }

    pub fn outputs(&self) -> &O {
        &self.outputs
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl<O: OutputPort> OutputPort for HardwareAdapter<O> {
    fn set_output(&mut self, channel: OutputChannel, level: Level) {
        self.outputs.set_output(channel, level);
    }
}

// ── EdgeDetector implementation ───────────────────────────────

impl<O> EdgeDetector for HardwareAdapter<O> {
    fn clear_pending(&mut self) {
        self.detection_enabled = false;
        hw_init::button_intr_clear();
    }

    fn enable(&mut self) {
        hw_init::button_intr_enable();
        self.detection_enabled = true;
        self.rearms = self.rearms.saturating_add(1);
    }
}
