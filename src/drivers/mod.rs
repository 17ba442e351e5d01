//! Interrupt-side state, output driver, and peripheral bring-up.

pub mod button;
pub mod countdown;
pub mod hw_init;
pub mod outputs;
pub mod watchdog;
