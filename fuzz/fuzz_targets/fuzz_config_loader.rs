#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    let Ok(cfg) = chute_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_ok() {
        // A config that validates must also be accepted by the engine builder.
        let params = chute_core::Parameters::from(&cfg);
        chute_core::DecisionEngine::builder()
            .with_parameters(params)
            .with_timestep(0.1)
            .build()
            .expect("validated config rejected by the engine");
    }
});
