//! Digital output driver for the buzzer/LED and relay.
//!
//! Wraps two `embedded_hal` output pins behind [`OutputPort`].  On the
//! device these are `esp_idf_hal::gpio::PinDriver`s; tests use plain mock
//! pins.  Both outputs are active HIGH.
//!
//! A failed pin write is logged and otherwise ignored: the engine reapplies
//! every level on the next poll.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::{Level, OutputChannel, OutputPort};
use crate::error::Error;

pub struct PinOutputs<B, R> {
    buzzer: B,
    relay: R,
    buzzer_level: Option<Level>,
    relay_level: Option<Level>,
    write_failures: u32,
}

impl<B: OutputPin, R: OutputPin> PinOutputs<B, R> {
    /// Take ownership of both pins and drive them LOW.
    pub fn new(buzzer: B, relay: R) -> Self {
        let mut outputs = Self {
            buzzer,
            relay,
            buzzer_level: None,
            relay_level: None,
            write_failures: 0,
        };
        outputs.all_off();
        outputs
    }

    /// Last level successfully written to `channel`.
    pub fn level(&self, channel: OutputChannel) -> Option<Level> {
        match channel {
            OutputChannel::Buzzer => self.buzzer_level,
            OutputChannel::Relay => self.relay_level,
        }
    }

    /// Writes rejected by the pin since boot.
    pub fn write_failures(&self) -> u32 {
        self.write_failures
    }

    pub fn all_off(&mut self) {
        self.set_output(OutputChannel::Buzzer, Level::Off);
        self.set_output(OutputChannel::Relay, Level::Off);
    }
}

fn drive<P: OutputPin>(pin: &mut P, level: Level) -> Result<(), P::Error> {
    match level {
        Level::On => pin.set_high(),
        Level::Off => pin.set_low(),
    }
}

impl<B: OutputPin, R: OutputPin> OutputPort for PinOutputs<B, R> {
    fn set_output(&mut self, channel: OutputChannel, level: Level) {
        let written = match channel {
            OutputChannel::Buzzer => drive(&mut self.buzzer, level).is_ok(),
            OutputChannel::Relay => drive(&mut self.relay, level).is_ok(),
        };

        if !written {
            self.write_failures = self.write_failures.saturating_add(1);
            warn!("{}", Error::Output(channel));
            return;
        }

        match channel {
            OutputChannel::Buzzer => self.buzzer_level = Some(level),
            OutputChannel::Relay => self.relay_level = Some(level),
        }
    }
}
