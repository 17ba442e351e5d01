fn main() {
    // Timing and trimmer-scale options are baked in through `option_env!`
    // in src/config.rs; rebuild whenever one of them changes.
    for var in [
        "STROBE_CPU_HZ",
        "STROBE_TICK_HZ",
        "STROBE_TIMER_PRESCALER",
        "STROBE_ADC_AVERAGE_STEPS",
        "STROBE_MAX_BLINKING_SECS",
        "STROBE_MAX_LOCK_TEN_SECS",
    ] {
        println!("cargo:rerun-if-env-changed={var}");
    }

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
