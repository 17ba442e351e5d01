//! The transition table.
//!
//! One row per state: what the outputs are while in it, what must hold for
//! it to be left, and where it goes.  The table is a `const`, so it cannot be
//! mutated at runtime.
//!
//! ```text
//!  WAIT_FOR_KEYPRESS ──[press]──▶ BLINKING ──[countdown done]──▶ BUZZER_LOCKED
//!          ▲                                                          │
//!          └──────────────────────[countdown done]────────────────────┘
//! ```
//!
//! | State           | Buzzer | Relay | Button  | Timer  | Next           |
//! |-----------------|--------|-------|---------|--------|----------------|
//! | WaitForKeypress | Off    | Off   | Require | Ignore | Blinking       |
//! | Blinking        | On     | Off   | Ignore  | Forbid | BuzzerLocked   |
//! | BuzzerLocked    | Off    | On    | Ignore  | Forbid | WaitForKeypress|

use super::StateId;
use crate::app::ports::Level;

/// Tri-state transition condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The input must be true.
    Require,
    /// The input must be false.
    Forbid,
    /// Don't care.
    Ignore,
}

impl Guard {
    /// Whether `input` satisfies this guard.
    pub const fn admits(self, input: bool) -> bool {
        match self {
            Self::Require => input,
            Self::Forbid => !input,
            Self::Ignore => true,
        }
    }
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRow {
    pub state: StateId,
    pub name: &'static str,
    pub buzzer: Level,
    pub relay: Level,
    /// Checked against the button latch.
    pub button: Guard,
    /// Checked against "countdown armed".
    pub timer: Guard,
    pub next: StateId,
}

/// Indexed by `StateId as usize`.
pub const TRANSITION_TABLE: [TransitionRow; StateId::COUNT] = [
    // Index 0: WaitForKeypress
    TransitionRow {
        state: StateId::WaitForKeypress,
        name: "WaitForKeypress",
        buzzer: Level::Off,
        relay: Level::Off,
        button: Guard::Require,
        timer: Guard::Ignore,
        next: StateId::Blinking,
    },
    // Index 1: Blinking
    TransitionRow {
        state: StateId::Blinking,
        name: "Blinking",
        buzzer: Level::On,
        relay: Level::Off,
        button: Guard::Ignore,
        timer: Guard::Forbid,
        next: StateId::BuzzerLocked,
    },
    // Index 2: BuzzerLocked
    TransitionRow {
        state: StateId::BuzzerLocked,
        name: "BuzzerLocked",
        buzzer: Level::Off,
        relay: Level::On,
        button: Guard::Ignore,
        timer: Guard::Forbid,
        next: StateId::WaitForKeypress,
    },
];

/// Row for `state`.
pub const fn row(state: StateId) -> TransitionRow {
    TRANSITION_TABLE[state as usize]
}

// Each row must sit at its own state's index.
const _: () = {
    let mut i = 0;
    while i < StateId::COUNT {
        assert!(TRANSITION_TABLE[i].state as usize == i, "transition table out of order");
        i += 1;
    }
};
