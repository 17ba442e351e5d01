//! Application boundary: port traits and the events the core emits.
//!
//! All interaction with hardware happens through the traits in [`ports`],
//! keeping the control core fully testable without real peripherals.

pub mod events;
pub mod ports;
