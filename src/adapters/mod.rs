//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                  |
//! |------------|----------------|------------------------------|
//! | `hardware` | OutputPort     | buzzer + relay GPIO          |
//! |            | EdgeDetector   | button GPIO interrupt        |
//! | `log_sink` | EventSink      | Serial log output            |

pub mod hardware;
pub mod log_sink;
