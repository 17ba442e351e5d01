//! Outbound application events.
//!
//! The [`Fsm`](crate::fsm::Fsm) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them; the firmware logs them.

use crate::drivers::countdown::CountdownValue;
use crate::fsm::StateId;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The engine has started (carries initial state).
    Started(StateId),

    /// The engine transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// A timed state armed the countdown.
    CountdownArmed { state: StateId, duration: CountdownValue },

    /// A latched button press was consumed by entering `Blinking`.
    PressConsumed,

    /// Button edge detection was turned back on.
    DetectionRearmed,
}
