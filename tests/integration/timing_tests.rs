//! Integration tests for the tick division and the countdown cadence.
//!
//! Sums the timer counts the alarm would be programmed with, the same
//! sequence the GPTimer callback loads on the device.

use crate::mock_hw::Board;

use strobe::config::BuildConfig;

/// Arm for `secs` and return the timer counts elapsed until disarm.
///
/// The first second starts on a plain period, so it is short by exactly
/// one remainder; every later second is exact.
fn counts_for(board: &Board, secs: u8) -> u64 {
    let division = board.countdown.division();
    board.countdown.arm(0, secs);
    // The first period is loaded at start-up with the plain compare value.
    let mut counts = u64::from(division.compare) + 1;
    while board.countdown.is_armed() {
        let next = board.countdown.on_timer_tick();
        if board.countdown.is_armed() {
            counts += u64::from(next) + 1;
        }
    }
    counts
}

#[test]
fn default_clock_gives_exact_seconds() {
    let board = Board::new();
    // 1 MHz / 256: compare 3905, remainder 64.
    assert_eq!(counts_for(&board, 5), 5 * 1_000_000 - 64);
}

#[test]
fn prescaled_clock_gives_exact_seconds() {
    let board = Board::with_config(BuildConfig {
        cpu_hz: 16_000_000,
        tick_hz: 250,
        timer_prescaler: 64,
        ..BuildConfig::DEFAULT
    });
    let division = board.countdown.division();
    assert_eq!(division.remainder, 0);
    assert_eq!(counts_for(&board, 3), 3 * 250_000);
}

#[test]
fn uneven_division_does_not_drift() {
    let board = Board::with_config(BuildConfig {
        cpu_hz: 1_000_003,
        tick_hz: 100,
        ..BuildConfig::DEFAULT
    });
    assert_eq!(board.countdown.division().remainder, 3);
    assert_eq!(counts_for(&board, 60), 60 * 1_000_003 - 3);
}

#[test]
fn disarmed_countdown_ignores_ticks() {
    let board = Board::new();
    let before = board.countdown.remaining();
    for _ in 0..1_000 {
        board.countdown.on_timer_tick();
    }
    assert!(!board.countdown.is_armed());
    assert_eq!(board.countdown.remaining(), before);
}

#[test]
fn rearm_restarts_the_second() {
    let board = Board::new();
    board.countdown.arm(0, 2);
    for _ in 0..200 {
        board.countdown.on_timer_tick();
    }
    board.countdown.arm(0, 1);
    // A full second of ticks is needed again.
    assert_eq!(board.tick_until_disarmed(), 256);
}
