//! Port traits: the hexagonal boundary between the control core and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Fsm (domain)
//! ```
//!
//! Driven adapters (digital outputs, edge-detect control, event sinks)
//! implement these traits.  The [`Fsm`](crate::fsm::Fsm) consumes them via
//! generics, so the control core never touches registers directly.

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The two digital outputs the controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputChannel {
    /// Buzzer / indicator LED.
    Buzzer,
    /// Strobe relay.
    Relay,
}

/// Requested output level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    On,
    Off,
}

impl Level {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

/// Write-side port: the engine sets the outputs through this on every poll.
///
/// Implementations must be idempotent; the same level is reapplied on
/// every iteration of the poll loop.
pub trait OutputPort {
    fn set_output(&mut self, channel: OutputChannel, level: Level);
}

// ───────────────────────────────────────────────────────────────
// Edge detector port (driven adapter: domain → button interrupt)
// ───────────────────────────────────────────────────────────────

/// Control over the button's edge-detect interrupt.
///
/// The interrupt disables itself after the first accepted edge; only the
/// engine turns it back on, through
/// [`ButtonLatch::rearm`](crate::drivers::button::ButtonLatch::rearm).
pub trait EdgeDetector {
    /// Discard any edge the hardware latched while detection was off.
    fn clear_pending(&mut self);

    /// Turn edge detection back on.
    fn enable(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The engine emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
