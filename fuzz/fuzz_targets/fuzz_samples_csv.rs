#![no_main]
use std::sync::Arc;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(rows) = chute_config::parse_samples_csv(data) else {
        return;
    };
    let samples: Vec<chute_core::Sample> = rows.into_iter().map(Into::into).collect();
    let Ok(rules) = chute_core::RuleBase::reference() else {
        return;
    };
    // An overflowing first interval yields a non-finite timestep, which the builder rejects.
    let Ok(report) = chute_core::run(&samples, &chute_core::Parameters::default(), Arc::new(rules))
    else {
        return;
    };
    assert_eq!(report.steps.len(), samples.len());
    assert!(report.steps.iter().all(|s| (0.0..=100.0).contains(&s.risk)));
});
