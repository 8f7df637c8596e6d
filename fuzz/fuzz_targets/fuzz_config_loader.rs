#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse errors and validation errors are both fine; panics are not.
    if let Ok(cfg) = soc_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // Converting a validated config into core settings must not panic either.
            let _ = soc_core::EstimatorBuilder::from_config(&cfg);
        }
    }
});
