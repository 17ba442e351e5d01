//! Strobe Controller Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter (Output + EdgeDetector)    LogEventSink       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │             Fsm (pure logic, busy poll loop)           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                            ▲                                   │
//! │     ButtonLatch · Countdown · Calibration  (&'static, atomics) │
//! │                            ▲                                   │
//! │   GPIO ISR        GPTimer alarm ISR        esp_timer sampler   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::gpio::{AnyOutputPin, PinDriver};
use log::info;

use strobe::adapters::hardware::HardwareAdapter;
use strobe::adapters::log_sink::LogEventSink;
use strobe::config::{BUILD, TIMING};
use strobe::drivers::button::ButtonLatch;
use strobe::drivers::countdown::Countdown;
use strobe::drivers::hw_init;
use strobe::drivers::outputs::PinOutputs;
use strobe::drivers::watchdog::Watchdog;
use strobe::fsm::context::FsmContext;
use strobe::fsm::Fsm;
use strobe::pins;
use strobe::sensors::trimmer::Calibration;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Strobe v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    info!(
        "Build: cpu={}Hz tick={}Hz prescaler={} K={} blink<={}s lock<={}s",
        BUILD.cpu_hz,
        BUILD.tick_hz,
        BUILD.timer_prescaler,
        BUILD.average_steps,
        BUILD.max_blinking_secs,
        BUILD.max_lock_ten_secs * 10
    );

    // ── 2. Shared state, alive for the whole firmware ─────────
    let latch: &'static ButtonLatch = Box::leak(Box::new(ButtonLatch::new()));
    let countdown: &'static Countdown = Box::leak(Box::new(Countdown::new(TIMING.division)));
    let calibration: &'static Calibration = Box::leak(Box::new(Calibration::new()));

    // ── 3. Outputs first, so nothing is driven during bring-up ─
    // SAFETY: pin numbers come from `pins` and are claimed nowhere else.
    let buzzer = PinDriver::output(unsafe { AnyOutputPin::new(pins::BUZZER_LED_GPIO) })?;
    let relay = PinDriver::output(unsafe { AnyOutputPin::new(pins::RELAY_GPIO) })?;
    let mut hw = HardwareAdapter::new(PinOutputs::new(buzzer, relay));

    // ── 4. Interrupt sources ──────────────────────────────────
    hw_init::init_peripherals(latch, countdown, calibration, TIMING.average_steps)?;
    let watchdog = Watchdog::new();

    // ── 5. Engine ─────────────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut fsm = Fsm::new(FsmContext::new(latch, countdown, calibration, TIMING.scale));
    fsm.start(&mut hw, &mut sink);

    info!("System ready. Entering poll loop.");
    fsm.run(&mut hw, &mut sink, || watchdog.feed())
}
