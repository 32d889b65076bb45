use chute_core::error::BuildError;
use chute_core::{DecisionEngine, Parameters, TriggerCfg};
use rstest::rstest;

#[rstest]
fn builder_missing_parameters_yields_typed_build_error() {
    let err = DecisionEngine::builder()
        .with_timestep(0.1)
        .try_build()
        .expect_err("should fail with MissingParameters");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingParameters) => {}
        other => panic!("expected MissingParameters, got: {other:?}"),
    }
}

#[rstest]
fn builder_missing_timestep_yields_typed_build_error() {
    let err = DecisionEngine::builder()
        .with_parameters(Parameters::default())
        .try_build()
        .expect_err("should fail with MissingTimestep");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingTimestep) => {}
        other => panic!("expected MissingTimestep, got: {other:?}"),
    }
}

fn with_trigger(fire: f64, reset: f64, min: f64) -> Parameters {
    Parameters {
        trigger: TriggerCfg {
            fire_threshold: fire,
            reset_threshold: reset,
            min_sustained_s: min,
        },
        ..Parameters::default()
    }
}

#[rstest]
#[case::reset_above_fire(with_trigger(80.0, 85.0, 2.0), 0.1, "reset threshold")]
#[case::reset_equal_fire(with_trigger(85.0, 85.0, 2.0), 0.1, "reset threshold")]
#[case::fire_out_of_range(with_trigger(120.0, 80.0, 2.0), 0.1, "fire threshold")]
#[case::negative_duration(with_trigger(85.0, 80.0, -1.0), 0.1, "min sustained")]
#[case::zero_timestep(Parameters::default(), 0.0, "timestep")]
#[case::nan_timestep(Parameters::default(), f64::NAN, "timestep")]
fn invalid_inputs_are_rejected(#[case] params: Parameters, #[case] dt: f64, #[case] needle: &str) {
    let err = DecisionEngine::builder()
        .with_parameters(params)
        .with_timestep(dt)
        .build()
        .expect_err("should be rejected");
    match err.downcast_ref::<BuildError>() {
        Some(BuildError::InvalidConfig(msg)) => assert!(msg.contains(needle), "{msg}"),
        other => panic!("expected InvalidConfig, got: {other:?}"),
    }
}

#[test]
fn negative_gain_is_rejected() {
    let mut params = Parameters::default();
    params.pid.kd = -0.5;
    let err = DecisionEngine::builder()
        .with_parameters(params)
        .with_timestep(0.1)
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("PID gains"), "{err}");
}
