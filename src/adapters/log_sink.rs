//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (the ESP-IDF logger on the device, so UART / USB-CDC).

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::CountdownArmed { state, duration } => {
                info!(
                    "TIMER | armed for {:?} | {}m{:02}s ({}s)",
                    state,
                    duration.minutes,
                    duration.seconds,
                    duration.total_secs()
                );
            }
            AppEvent::PressConsumed => {
                info!("BUTTON | press consumed");
            }
            AppEvent::DetectionRearmed => {
                info!("BUTTON | edge detection re-armed");
            }
        }
    }
}
