//! Integration tests for the full press → blink → lock → wait cycle.
//!
//! Drive the engine the way the device does: interrupt-side handlers are
//! called directly on the shared components, and the engine is polled
//! against `MockHardware`.

use crate::mock_hw::{Board, HwCall, MockHardware, RecordingSink};

use strobe::app::events::AppEvent;
use strobe::app::ports::{Level, OutputChannel};
use strobe::drivers::countdown::CountdownValue;
use strobe::fsm::{Blocked, Poll, StateId};
use strobe::sensors::trimmer::{Averager, TrimmerChannel};

fn feed_channel(avg: &mut Averager<'_>, samples: &[u8]) {
    for &s in samples {
        avg.on_conversion(s);
    }
}

// ── Full cycle ────────────────────────────────────────────────

#[test]
fn full_cycle_drives_outputs_and_rearms() {
    let board = Board::new();
    let mut fsm = board.fsm();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    fsm.start(&mut hw, &mut sink);

    // Idle: both outputs off, waiting on the button.
    assert_eq!(fsm.poll(&mut hw, &mut sink), Poll::Retry(Blocked::Button));
    assert_eq!(hw.outputs(), (Some(Level::Off), Some(Level::Off)));

    // Press.
    assert!(board.latch.on_edge());
    assert_eq!(
        fsm.poll(&mut hw, &mut sink),
        Poll::Advanced { from: StateId::WaitForKeypress, to: StateId::Blinking }
    );
    assert!(board.countdown.is_armed());
    assert_eq!(board.countdown.remaining(), CountdownValue { minutes: 0, seconds: 16 });

    assert_eq!(fsm.poll(&mut hw, &mut sink), Poll::Retry(Blocked::Timer));
    assert_eq!(hw.outputs(), (Some(Level::On), Some(Level::Off)));

    // 16 s at 256 ticks/s.
    assert_eq!(board.tick_until_disarmed(), 16 * 256);
    assert_eq!(
        fsm.poll(&mut hw, &mut sink),
        Poll::Advanced { from: StateId::Blinking, to: StateId::BuzzerLocked }
    );
    assert_eq!(fsm.poll(&mut hw, &mut sink), Poll::Retry(Blocked::Timer));
    assert_eq!(hw.outputs(), (Some(Level::Off), Some(Level::On)));

    // Lock: 128 / (256 / 20) = 10 s.
    assert_eq!(board.countdown.remaining(), CountdownValue { minutes: 0, seconds: 10 });
    assert_eq!(board.tick_until_disarmed(), 10 * 256);

    hw.clear();
    assert!(!board.latch.is_detecting());
    assert_eq!(
        fsm.poll(&mut hw, &mut sink),
        Poll::Advanced { from: StateId::BuzzerLocked, to: StateId::WaitForKeypress }
    );
    assert_eq!(hw.edge_calls(), [HwCall::ClearPending, HwCall::Enable]);
    assert!(board.latch.is_detecting());

    assert_eq!(fsm.poll(&mut hw, &mut sink), Poll::Retry(Blocked::Button));
    assert_eq!(hw.outputs(), (Some(Level::Off), Some(Level::Off)));

    assert_eq!(
        sink.events,
        [
            AppEvent::DetectionRearmed,
            AppEvent::Started(StateId::WaitForKeypress),
            AppEvent::StateChanged { from: StateId::WaitForKeypress, to: StateId::Blinking },
            AppEvent::PressConsumed,
            AppEvent::CountdownArmed {
                state: StateId::Blinking,
                duration: CountdownValue { minutes: 0, seconds: 16 },
            },
            AppEvent::StateChanged { from: StateId::Blinking, to: StateId::BuzzerLocked },
            AppEvent::CountdownArmed {
                state: StateId::BuzzerLocked,
                duration: CountdownValue { minutes: 0, seconds: 10 },
            },
            AppEvent::StateChanged { from: StateId::BuzzerLocked, to: StateId::WaitForKeypress },
            AppEvent::DetectionRearmed,
        ]
    );
}

#[test]
fn second_cycle_runs_like_the_first() {
    let board = Board::new();
    let mut fsm = board.fsm();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    fsm.start(&mut hw, &mut sink);

    for _ in 0..2 {
        board.latch.on_edge();
        fsm.poll(&mut hw, &mut sink);
        board.tick_until_disarmed();
        fsm.poll(&mut hw, &mut sink);
        board.tick_until_disarmed();
        fsm.poll(&mut hw, &mut sink);
        assert_eq!(fsm.current_state(), StateId::WaitForKeypress);
    }
    assert_eq!(sink.count(&AppEvent::PressConsumed), 2);
    assert_eq!(fsm.recent_transitions().count(), 6);
}

// ── Calibration feeds durations ───────────────────────────────

#[test]
fn averaged_trimmers_set_both_durations() {
    let board = Board::new();
    let mut avg = Averager::new(&board.calibration, board.timing.average_steps);
    // K = 3: first sample of each window is discarded.
    feed_channel(&mut avg, &[0, 250, 255, 254]);
    assert_eq!(avg.channel(), TrimmerChannel::BuzzerLock);
    feed_channel(&mut avg, &[255, 30, 40, 50]);

    let mut fsm = board.fsm();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    fsm.start(&mut hw, &mut sink);

    board.latch.on_edge();
    fsm.poll(&mut hw, &mut sink);
    // (250 + 255 + 254) / 3 = 253; 253 / 8 = 31 s
    assert_eq!(board.countdown.remaining(), CountdownValue { minutes: 0, seconds: 31 });

    board.tick_until_disarmed();
    fsm.poll(&mut hw, &mut sink);
    // 40 / 12 = 3 s
    assert_eq!(board.countdown.remaining(), CountdownValue { minutes: 0, seconds: 3 });
}

#[test]
fn reading_changed_mid_blink_only_affects_next_arm() {
    let board = Board::new();
    let mut fsm = board.fsm();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    fsm.start(&mut hw, &mut sink);

    board.latch.on_edge();
    fsm.poll(&mut hw, &mut sink);
    board.calibration.publish(TrimmerChannel::Blinking, 255);
    assert_eq!(board.countdown.remaining().seconds, 16);
}

#[test]
fn long_blink_crosses_minute_boundary() {
    let board = Board::with_config(strobe::config::BuildConfig {
        max_blinking_secs: 255,
        ..strobe::config::BuildConfig::DEFAULT
    });
    board.calibration.publish(TrimmerChannel::Blinking, 200);
    let mut fsm = board.fsm();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    fsm.start(&mut hw, &mut sink);

    board.latch.on_edge();
    fsm.poll(&mut hw, &mut sink);
    // 256 / 255 = 1, so the reading is the duration: 200 s.
    assert_eq!(board.countdown.remaining(), CountdownValue { minutes: 3, seconds: 20 });
    assert_eq!(board.tick_until_disarmed(), 200 * 256);
}

// ── Button ────────────────────────────────────────────────────

#[test]
fn bounce_yields_one_press() {
    let board = Board::new();
    let mut fsm = board.fsm();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    fsm.start(&mut hw, &mut sink);

    let accepted = (0..5).filter(|_| board.latch.on_edge()).count();
    assert_eq!(accepted, 1);

    fsm.poll(&mut hw, &mut sink);
    assert_eq!(sink.count(&AppEvent::PressConsumed), 1);
    assert!(!board.latch.is_pressed());
}

#[test]
fn presses_while_timed_are_lost() {
    let board = Board::new();
    let mut fsm = board.fsm();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    fsm.start(&mut hw, &mut sink);

    board.latch.on_edge();
    fsm.poll(&mut hw, &mut sink);
    board.latch.on_edge();
    board.tick_until_disarmed();
    fsm.poll(&mut hw, &mut sink);
    board.latch.on_edge();
    board.tick_until_disarmed();
    fsm.poll(&mut hw, &mut sink);

    // Back in WaitForKeypress with nothing queued.
    assert_eq!(fsm.current_state(), StateId::WaitForKeypress);
    assert!(!board.latch.is_pressed());
    assert_eq!(fsm.poll(&mut hw, &mut sink), Poll::Retry(Blocked::Button));
}

#[test]
fn outputs_reapplied_every_poll() {
    let board = Board::new();
    let mut fsm = board.fsm();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    fsm.start(&mut hw, &mut sink);
    hw.clear();

    for _ in 0..4 {
        fsm.poll(&mut hw, &mut sink);
    }
    let writes = hw
        .calls
        .iter()
        .filter(|c| matches!(c, HwCall::Output { channel: OutputChannel::Relay, .. }))
        .count();
    assert_eq!(writes, 4);
    assert_eq!(fsm.retries(Blocked::Button), 4);
}
