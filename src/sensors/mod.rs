//! Analog inputs.
//!
//! The only analog inputs on this board are the two duration trimmers; see
//! [`trimmer`].

pub mod trimmer;
