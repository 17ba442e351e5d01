//! One-shot hardware peripheral initialization.
//!
//! Brings up the three interrupt-side producers using raw ESP-IDF sys
//! calls.  Called once from `main()` before the poll loop starts.
//!
//! | Source              | Peripheral           | Writes to        |
//! |---------------------|----------------------|------------------|
//! | button falling edge | GPIO ISR             | `ButtonLatch`    |
//! | periodic tick       | GPTimer alarm (ISR)  | `Countdown`      |
//! | trimmer sampling    | esp_timer (task)     | `Calibration`    |
//!
//! Each handler receives its `&'static` target through the callback
//! argument pointer; nothing here is a global.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use crate::drivers::button::ButtonLatch;
use crate::drivers::countdown::Countdown;
use crate::sensors::trimmer::Calibration;

#[cfg(target_os = "espidf")]
use crate::pins;
#[cfg(target_os = "espidf")]
use crate::sensors::trimmer::{to_8bit, Averager, TrimmerChannel};

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    TimerInitFailed(i32),
    AdcInitFailed(i32),
}

impl HwInitError {
    /// Which bring-up step failed.
    pub fn stage(self) -> &'static str {
        match self {
            Self::GpioConfigFailed(_) => "button GPIO",
            Self::IsrInstallFailed(_) => "GPIO ISR service",
            Self::TimerInitFailed(_) => "tick timer",
            Self::AdcInitFailed(_) => "trimmer ADC",
        }
    }
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::TimerInitFailed(rc)  => write!(f, "GPTimer setup failed (rc={})", rc),
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

impl From<HwInitError> for crate::error::Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e.stage())
    }
}

#[cfg(target_os = "espidf")]
fn check(ret: esp_err_t, err: fn(i32) -> HwInitError) -> Result<(), HwInitError> {
    if ret == ESP_OK as i32 { Ok(()) } else { Err(err(ret)) }
}

/// Bring up every interrupt source.  The shared handles must outlive the
/// handlers, hence `'static`.
pub fn init_peripherals(
    latch: &'static ButtonLatch,
    countdown: &'static Countdown,
    calibration: &'static Calibration,
    average_steps: u8,
) -> Result<(), HwInitError> {
    init_button(latch)?;
    start_tick_timer(countdown)?;
    start_trimmer_sampler(calibration, average_steps)?;
    info!("hw_init: all peripherals configured");
    Ok(())
}

// ── Button (GPIO, falling edge) ───────────────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(arg: *mut core::ffi::c_void) {
    // SAFETY: arg is the &'static ButtonLatch registered in init_button().
    let latch = unsafe { &*(arg as *const ButtonLatch) };
    if latch.on_edge() {
        // Single-shot: only the engine turns detection back on.
        unsafe { gpio_intr_disable(pins::BUTTON_GPIO) };
    }
}

#[cfg(target_os = "espidf")]
pub fn init_button(latch: &'static ButtonLatch) -> Result<(), HwInitError> {
    let btn_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
    };
    // SAFETY: Called once from main() before the poll loop; single-threaded.
    // The ISR only touches the lock-free latch and the pin's own enable bit.
    unsafe {
        check(gpio_config(&btn_cfg), HwInitError::GpioConfigFailed)?;

        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        check(
            gpio_isr_handler_add(
                pins::BUTTON_GPIO,
                Some(button_gpio_isr),
                latch as *const ButtonLatch as *mut core::ffi::c_void,
            ),
            HwInitError::IsrInstallFailed,
        )?;
        gpio_intr_enable(pins::BUTTON_GPIO);
    }
    info!("hw_init: button on GPIO{} (falling edge)", pins::BUTTON_GPIO);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_button(_latch: &'static ButtonLatch) -> Result<(), HwInitError> {
    info!("hw_init(sim): button ISR skipped");
    Ok(())
}

/// Re-enable the button interrupt.
#[cfg(target_os = "espidf")]
pub fn button_intr_enable() {
    // SAFETY: pin configured in init_button(); enable bit write only.
    unsafe { gpio_intr_enable(pins::BUTTON_GPIO); }
}

#[cfg(not(target_os = "espidf"))]
pub fn button_intr_enable() {}

/// Drop an edge latched while the button interrupt was disabled.
#[cfg(target_os = "espidf")]
pub fn button_intr_clear() {
    // SAFETY: pin configured in init_button().  Reprogramming the trigger
    // type resets the pin's edge status.
    unsafe {
        gpio_set_intr_type(pins::BUTTON_GPIO, gpio_int_type_t_GPIO_INTR_DISABLE);
        gpio_set_intr_type(pins::BUTTON_GPIO, gpio_int_type_t_GPIO_INTR_NEGEDGE);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn button_intr_clear() {}

// ── Countdown tick (GPTimer alarm) ────────────────────────────

#[cfg(target_os = "espidf")]
fn alarm_config(compare: u16) -> gptimer_alarm_config_t {
    let mut alarm = gptimer_alarm_config_t {
        // A period is compare + 1 counts.
        alarm_count: u64::from(compare) + 1,
        reload_count: 0,
        ..Default::default()
    };
    alarm.flags.set_auto_reload_on_alarm(1);
    alarm
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_alarm_cb(
    timer: gptimer_handle_t,
    _edata: *const gptimer_alarm_event_data_t,
    user_ctx: *mut core::ffi::c_void,
) -> bool {
    // SAFETY: user_ctx is the &'static Countdown registered in start_tick_timer().
    let countdown = unsafe { &*(user_ctx as *const Countdown) };
    let next = countdown.on_timer_tick();
    let alarm = alarm_config(next);
    unsafe { gptimer_set_alarm_action(timer, &alarm) };
    false
}

#[cfg(target_os = "espidf")]
pub fn start_tick_timer(countdown: &'static Countdown) -> Result<(), HwInitError> {
    let division = countdown.division();
    let cfg = gptimer_config_t {
        clk_src: soc_periph_gptimer_clk_src_t_GPTIMER_CLK_SRC_DEFAULT,
        direction: gptimer_count_direction_t_GPTIMER_COUNT_UP,
        resolution_hz: division.counts_per_second(),
        ..Default::default()
    };
    let callbacks = gptimer_event_callbacks_t {
        on_alarm: Some(tick_alarm_cb),
    };
    let mut timer: gptimer_handle_t = core::ptr::null_mut();

    // SAFETY: Called once at boot.  The handle is never released; the
    // timer runs for the lifetime of the firmware.
    unsafe {
        check(gptimer_new_timer(&cfg, &mut timer), HwInitError::TimerInitFailed)?;
        check(
            gptimer_register_event_callbacks(
                timer,
                &callbacks,
                countdown as *const Countdown as *mut core::ffi::c_void,
            ),
            HwInitError::TimerInitFailed,
        )?;
        check(gptimer_enable(timer), HwInitError::TimerInitFailed)?;
        check(
            gptimer_set_alarm_action(timer, &alarm_config(division.compare)),
            HwInitError::TimerInitFailed,
        )?;
        check(gptimer_start(timer), HwInitError::TimerInitFailed)?;
    }

    info!(
        "hw_init: tick timer {} Hz (compare={}, remainder={}, {} counts/s)",
        division.ticks_per_second,
        division.compare,
        division.remainder,
        division.counts_per_second()
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer(countdown: &'static Countdown) -> Result<(), HwInitError> {
    let division = countdown.division();
    info!(
        "hw_init(sim): tick timer not started ({} Hz, compare={}, remainder={})",
        division.ticks_per_second, division.compare, division.remainder
    );
    Ok(())
}

// ── Trimmer sampling (ADC1 oneshot + esp_timer) ───────────────

/// Owned by the sampling timer callback; nothing else touches it.
#[cfg(target_os = "espidf")]
struct TrimmerSampler {
    adc: adc_oneshot_unit_handle_t,
    averager: Averager<'static>,
}

#[cfg(target_os = "espidf")]
fn adc_channel(channel: TrimmerChannel) -> adc_channel_t {
    match channel {
        TrimmerChannel::Blinking => pins::BLINKING_TRIMMER_ADC_CHANNEL,
        TrimmerChannel::BuzzerLock => pins::LOCK_TRIMMER_ADC_CHANNEL,
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn trimmer_sample_cb(arg: *mut core::ffi::c_void) {
    // SAFETY: arg is the leaked TrimmerSampler; esp_timer task dispatch
    // runs callbacks one at a time, so this is the only live reference.
    let sampler = unsafe { &mut *(arg as *mut TrimmerSampler) };
    let mut raw: i32 = 0;
    let channel = adc_channel(sampler.averager.channel());
    let ret = unsafe { adc_oneshot_read(sampler.adc, channel, &mut raw) };
    if ret != ESP_OK as i32 {
        // Skip the slot; the same channel is converted next time.
        return;
    }
    let reading = to_8bit(raw.max(0) as u16, pins::ADC_BITWIDTH);
    sampler.averager.on_conversion(reading);
}

#[cfg(target_os = "espidf")]
pub fn start_trimmer_sampler(
    calibration: &'static Calibration,
    average_steps: u8,
) -> Result<(), HwInitError> {
    let mut adc: adc_oneshot_unit_handle_t = core::ptr::null_mut();
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    // SAFETY: Called once at boot, before the sampling timer exists.
    unsafe {
        check(adc_oneshot_new_unit(&init_cfg, &mut adc), HwInitError::AdcInitFailed)?;
        for channel in [TrimmerChannel::Blinking, TrimmerChannel::BuzzerLock] {
            check(
                adc_oneshot_config_channel(adc, adc_channel(channel), &chan_cfg),
                HwInitError::AdcInitFailed,
            )?;
        }
    }

    let sampler: &'static mut TrimmerSampler = Box::leak(Box::new(TrimmerSampler {
        adc,
        averager: Averager::new(calibration, average_steps),
    }));

    let args = esp_timer_create_args_t {
        callback: Some(trimmer_sample_cb),
        arg: sampler as *mut TrimmerSampler as *mut core::ffi::c_void,
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: c"trimmer".as_ptr(),
        skip_unhandled_events: true,
    };
    let mut handle: esp_timer_handle_t = core::ptr::null_mut();

    // SAFETY: the callback argument is leaked and lives forever.
    unsafe {
        check(esp_timer_create(&args, &mut handle), HwInitError::TimerInitFailed)?;
        check(
            esp_timer_start_periodic(handle, pins::TRIMMER_SAMPLE_PERIOD_US),
            HwInitError::TimerInitFailed,
        )?;
    }

    info!(
        "hw_init: trimmer sampler every {}us, {} samples per channel",
        pins::TRIMMER_SAMPLE_PERIOD_US, average_steps
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_trimmer_sampler(
    calibration: &'static Calibration,
    average_steps: u8,
) -> Result<(), HwInitError> {
    info!(
        "hw_init(sim): trimmer sampler not started (K={}, readings {}/{})",
        average_steps,
        calibration.blinking(),
        calibration.buzzer_lock()
    );
    Ok(())
}
