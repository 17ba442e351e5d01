//! Single-shot button latch.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up. The GPIO interrupt fires on the
//! falling edge; the ISR calls [`ButtonLatch::on_edge`] and, when the edge is
//! accepted, disables the pin interrupt.  Contact bounce after the first edge
//! therefore never reaches the latch: debounce-by-disable.
//!
//! ## Lifecycle
//!
//! | Step              | Who          | Effect                                  |
//! |-------------------|--------------|-----------------------------------------|
//! | `on_edge()`       | GPIO ISR     | latch set, detection off                |
//! | `is_pressed()`    | engine guard | read only                               |
//! | `clear()`         | engine       | latch cleared on entering `Blinking`    |
//! | `rearm()`         | engine       | stale edge dropped, detection back on   |
//!
//! Presses that arrive while detection is off are lost; there is no queue.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::app::ports::EdgeDetector;

/// Pending-press flag plus the software view of the edge-detect enable.
#[derive(Debug)]
pub struct ButtonLatch {
    pressed: AtomicBool,
    detecting: AtomicBool,
}

impl ButtonLatch {
    /// Detection starts enabled, as the board enables the edge interrupt at
    /// boot.
    pub const fn new() -> Self {
        Self {
            pressed: AtomicBool::new(false),
            detecting: AtomicBool::new(true),
        }
    }

    /// ISR handler for a button edge.
    ///
    /// Returns `true` if the edge was accepted, in which case the caller must
    /// disable the hardware interrupt.  Lock-free; safe from interrupt context.
    pub fn on_edge(&self) -> bool {
        if self.detecting.swap(false, Ordering::AcqRel) {
            self.pressed.store(true, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// A press is latched and not yet consumed.
    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Acquire)
    }

    /// Edge detection is currently enabled.
    pub fn is_detecting(&self) -> bool {
        self.detecting.load(Ordering::Acquire)
    }

    /// Drop the latched press.
    pub fn clear(&self) {
        self.pressed.store(false, Ordering::Release);
    }

    /// Read and clear the latched press in one step.
    pub fn consume(&self) -> bool {
        self.pressed.swap(false, Ordering::AcqRel)
    }

    /// Re-enable edge detection, dropping any edge the hardware latched
    /// while it was off.
    pub fn rearm(&self, detector: &mut impl EdgeDetector) {
        detector.clear_pending();
        self.detecting.store(true, Ordering::Release);
        detector.enable();
    }
}

impl Default for ButtonLatch {
    fn default() -> Self {
        Self::new()
    }
}
