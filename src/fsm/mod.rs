//! Table-driven finite state machine engine.
//!
//! Classic embedded FSM pattern: outputs are a pure function of the state,
//! transitions are a pure function of two tri-state guards.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  TRANSITION_TABLE                                            │
//! │  ┌─────────────────┬────────┬───────┬─────────┬────────┬────┐│
//! │  │ StateId         │ buzzer │ relay │ button  │ timer  │next││
//! │  ├─────────────────┼────────┼───────┼─────────┼────────┼────┤│
//! │  │ WaitForKeypress │ Level  │ Level │ Guard   │ Guard  │ Id ││
//! │  │ Blinking        │ Level  │ Level │ Guard   │ Guard  │ Id ││
//! │  │ BuzzerLocked    │ Level  │ Level │ Guard   │ Guard  │ Id ││
//! │  └─────────────────┴────────┴───────┴─────────┴────────┴────┘│
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each [`poll`](Fsm::poll):
//!
//! 1. looks up the current row and applies its output levels;
//! 2. checks the button guard against the latch, then the timer guard
//!    against "countdown armed"; a failing guard ends the iteration as
//!    [`Poll::Retry`] with no state change;
//! 3. otherwise moves to `next` and runs that state's entry action.
//!
//! [`run`](Fsm::run) is the unbounded busy loop around `poll`.

pub mod context;
pub mod states;

use heapless::HistoryBuffer;
use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::{EdgeDetector, EventSink, OutputChannel, OutputPort};
use crate::drivers::countdown::CountdownValue;
use context::FsmContext;

/// Transitions kept for inspection.
pub const HISTORY_LEN: usize = 16;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all device states.
/// Must stay in sync with [`states::TRANSITION_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    WaitForKeypress = 0,
    Blinking = 1,
    BuzzerLocked = 2,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert an index back to `StateId`.  Panics on out-of-range in debug
    /// builds; returns `WaitForKeypress` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::WaitForKeypress,
            1 => Self::Blinking,
            2 => Self::BuzzerLocked,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::WaitForKeypress
            }
        }
    }

    pub const fn name(self) -> &'static str {
        states::row(self).name
    }
}

// ---------------------------------------------------------------------------
// Poll outcome
// ---------------------------------------------------------------------------

/// Which guard held the machine in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    Button,
    Timer,
}

/// Result of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A guard failed; spin and poll again.
    Retry(Blocked),
    /// Both guards passed and the entry action of `to` has run.
    Advanced { from: StateId, to: StateId },
}

/// One recorded transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
    /// Poll count at which it happened.
    pub poll: u64,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Holds the current state, the [`FsmContext`] handles it reads guards
/// from and re-primes on entry, and a short transition history.
pub struct Fsm<'a> {
    ctx: FsmContext<'a>,
    current: StateId,
    polls: u64,
    button_retries: u64,
    timer_retries: u64,
    history: HistoryBuffer<Transition, HISTORY_LEN>,
}

impl<'a> Fsm<'a> {
    /// Construct the engine in `WaitForKeypress`.
    pub fn new(ctx: FsmContext<'a>) -> Self {
        Self {
            ctx,
            current: StateId::WaitForKeypress,
            polls: 0,
            button_retries: 0,
            timer_retries: 0,
            history: HistoryBuffer::new(),
        }
    }

    /// Run the entry action of the initial state.
    /// Call once after construction, before the first `poll()`.
    pub fn start(&mut self, hw: &mut impl EdgeDetector, sink: &mut impl EventSink) {
        info!("FSM starting in state: {}", self.current.name());
        self.enter(self.current, hw, sink);
        sink.emit(&AppEvent::Started(self.current));
    }

    /// One iteration of the control loop.
    pub fn poll(
        &mut self,
        hw: &mut (impl OutputPort + EdgeDetector),
        sink: &mut impl EventSink,
    ) -> Poll {
        self.polls += 1;
        let row = states::row(self.current);

        hw.set_output(OutputChannel::Buzzer, row.buzzer);
        hw.set_output(OutputChannel::Relay, row.relay);

        if !row.button.admits(self.ctx.latch.is_pressed()) {
            self.button_retries += 1;
            return Poll::Retry(Blocked::Button);
        }
        if !row.timer.admits(self.ctx.countdown.is_armed()) {
            self.timer_retries += 1;
            return Poll::Retry(Blocked::Timer);
        }

        let from = self.current;
        let to = row.next;
        info!("FSM transition: {} -> {}", from.name(), to.name());

        self.current = to;
        self.history.write(Transition {
            from,
            to,
            poll: self.polls,
        });
        sink.emit(&AppEvent::StateChanged { from, to });

        self.enter(to, hw, sink);
        Poll::Advanced { from, to }
    }

    /// Poll forever.  `on_iteration` runs at the top of every iteration
    /// (the firmware feeds its watchdog there).
    pub fn run(
        &mut self,
        hw: &mut (impl OutputPort + EdgeDetector),
        sink: &mut impl EventSink,
        mut on_iteration: impl FnMut(),
    ) -> ! {
        loop {
            on_iteration();
            match self.poll(hw, sink) {
                Poll::Retry(_) => core::hint::spin_loop(),
                Poll::Advanced { .. } => {}
            }
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// Iterations run so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Iterations that ended on the given guard.
    pub fn retries(&self, blocked: Blocked) -> u64 {
        match blocked {
            Blocked::Button => self.button_retries,
            Blocked::Timer => self.timer_retries,
        }
    }

    /// Recent transitions, oldest first.
    pub fn recent_transitions(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.history.oldest_ordered()
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn enter(&mut self, state: StateId, hw: &mut impl EdgeDetector, sink: &mut impl EventSink) {
        match state {
            StateId::WaitForKeypress => {
                self.ctx.latch.rearm(hw);
                sink.emit(&AppEvent::DetectionRearmed);
            }
            StateId::Blinking => {
                if self.ctx.latch.consume() {
                    sink.emit(&AppEvent::PressConsumed);
                }
                let reading = self.ctx.calibration.blinking();
                let duration = self.ctx.scale.blinking(reading);
                self.arm_countdown(state, reading, duration, sink);
            }
            StateId::BuzzerLocked => {
                let reading = self.ctx.calibration.buzzer_lock();
                let duration = self.ctx.scale.buzzer_lock(reading);
                self.arm_countdown(state, reading, duration, sink);
            }
        }
    }

    fn arm_countdown(
        &self,
        state: StateId,
        reading: u8,
        duration: CountdownValue,
        sink: &mut impl EventSink,
    ) {
        debug!(
            "{}: trimmer={} -> {}m{:02}s",
            state.name(),
            reading,
            duration.minutes,
            duration.seconds
        );
        self.ctx.countdown.arm(duration.minutes, duration.seconds);
        sink.emit(&AppEvent::CountdownArmed { state, duration });
    }
}
