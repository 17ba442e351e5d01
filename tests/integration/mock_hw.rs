//! Mock hardware adapter for integration tests.
//!
//! Records every output and edge-detector call so tests can assert on the
//! full command history without touching real GPIO registers.

use strobe::app::events::AppEvent;
use strobe::app::ports::{EdgeDetector, EventSink, Level, OutputChannel, OutputPort};
use strobe::config::{BuildConfig, Timing};
use strobe::drivers::button::ButtonLatch;
use strobe::drivers::countdown::Countdown;
use strobe::fsm::context::FsmContext;
use strobe::fsm::Fsm;
use strobe::sensors::trimmer::Calibration;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    Output { channel: OutputChannel, level: Level },
    ClearPending,
    Enable,
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<HwCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent level written to `channel`.
    pub fn level(&self, channel: OutputChannel) -> Option<Level> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Output { channel: ch, level } if *ch == channel => Some(*level),
            _ => None,
        })
    }

    pub fn outputs(&self) -> (Option<Level>, Option<Level>) {
        (self.level(OutputChannel::Buzzer), self.level(OutputChannel::Relay))
    }

    /// Edge-detector calls only, in order.
    pub fn edge_calls(&self) -> Vec<HwCall> {
        self.calls
            .iter()
            .copied()
            .filter(|c| !matches!(c, HwCall::Output { .. }))
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl OutputPort for MockHardware {
    fn set_output(&mut self, channel: OutputChannel, level: Level) {
        self.calls.push(HwCall::Output { channel, level });
    }
}

impl EdgeDetector for MockHardware {
    fn clear_pending(&mut self) {
        self.calls.push(HwCall::ClearPending);
    }

    fn enable(&mut self) {
        self.calls.push(HwCall::Enable);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, event: &AppEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Board ─────────────────────────────────────────────────────

/// The three interrupt-written components plus the timing they were
/// built with; stands in for the leaked `&'static` state on the device.
pub struct Board {
    pub latch: ButtonLatch,
    pub countdown: Countdown,
    pub calibration: Calibration,
    pub timing: Timing,
}

#[allow(dead_code)]
impl Board {
    pub fn new() -> Self {
        Self::with_config(BuildConfig::DEFAULT)
    }

    pub fn with_config(config: BuildConfig) -> Self {
        let timing = config.validate().expect("test config must be valid");
        Self {
            latch: ButtonLatch::new(),
            countdown: Countdown::new(timing.division),
            calibration: Calibration::new(),
            timing,
        }
    }

    pub fn fsm(&self) -> Fsm<'_> {
        Fsm::new(FsmContext::new(
            &self.latch,
            &self.countdown,
            &self.calibration,
            self.timing.scale,
        ))
    }

    /// Drive the tick ISR until the countdown disarms.  Returns the number
    /// of ticks taken.
    pub fn tick_until_disarmed(&self) -> u32 {
        let mut ticks = 0;
        while self.countdown.is_armed() {
            self.countdown.on_timer_tick();
            ticks += 1;
        }
        ticks
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
