use chute_core::PidGains;
use chute_core::error::ProximityError;
use chute_core::proximity::proximity_ratio;
use chute_core::severity::SeverityEstimator;
use chute_core::trend::{TrendAverager, window_capacity};
use rstest::rstest;

#[test]
fn pid_stays_at_floor_without_vertical_speed() {
    let mut pid = SeverityEstimator::new(PidGains::default());
    for _ in 0..200 {
        assert_eq!(pid.update(0.0, 0.1), 0.0);
    }
    assert_eq!(pid.state().integral, 0.0);
}

#[test]
fn pid_first_step_has_no_derivative_term() {
    let mut pid = SeverityEstimator::new(PidGains::default());
    assert_eq!(pid.state().prev_error, None);
    // e = 2, integral = 2 * 0.5 = 1, no derivative yet
    // 5*2 + 1*1 = 11
    assert_eq!(pid.update(-2.0, 0.5), 11.0);
    assert_eq!(pid.state().prev_error, Some(2.0));
    // e = 2, integral = 2, derivative = 0 -> 12
    assert_eq!(pid.update(-2.0, 0.5), 12.0);
    assert_eq!(pid.last_output(), 12.0);
}

#[test]
fn pid_starting_mid_descent_is_not_saturated_by_derivative() {
    let mut pid = SeverityEstimator::new(PidGains::default());
    // 5*14 + 1*(14*0.1) = 71.4
    let first = pid.update(-14.0, 0.1);
    assert!((first - 71.4).abs() < 1e-9, "first severity {first}");
    // e steps from 14 to 15: derivative 10 adds 0.5*10
    let second = pid.update(-15.0, 0.1);
    assert!((second - (75.0 + 2.9 + 5.0)).abs() < 1e-9, "second severity {second}");
}

#[rstest]
#[case::climbing(5.0, 0.0)]
#[case::falling_fast(-50.0, 100.0)]
fn pid_output_is_clamped(#[case] v: f64, #[case] expected: f64) {
    let mut pid = SeverityEstimator::new(PidGains::default());
    assert_eq!(pid.update(v, 1.0), expected);
}

#[test]
fn pid_integral_is_not_limited_by_clamp() {
    let mut pid = SeverityEstimator::new(PidGains::default());
    for _ in 0..10 {
        pid.update(-20.0, 1.0);
    }
    assert_eq!(pid.state().integral, 200.0);
    // climbing now, but the wound-up integral keeps severity pinned
    assert_eq!(pid.update(5.0, 1.0), 100.0);
}

#[test]
fn trend_passes_through_until_full_then_averages() {
    let mut t = TrendAverager::new(5);
    for i in 0..4 {
        assert_eq!(t.push(-20.0 - f64::from(i)), -20.0 - f64::from(i));
    }
    assert!(!t.is_full());
    assert_eq!(t.push(-30.0), -23.2);
    assert!(t.is_full());
}

#[test]
fn constant_pitch_averages_to_itself() {
    let mut t = TrendAverager::new(5);
    let mut last = 0.0;
    for _ in 0..5 {
        last = t.push(-20.0);
    }
    assert_eq!(last, -20.0);
    assert_eq!(t.current(), -20.0);
}

#[rstest]
#[case(3.0, 0.1, 30, false)]
#[case(3.0, 0.12, 25, false)]
#[case(3.0, 0.5, 6, false)]
#[case(0.0, 0.5, 1, true)]
#[case(0.2, 1.0, 1, true)]
#[case(3.0, 0.0, 1, true)]
fn window_capacity_rounds_and_clamps(
    #[case] persistence: f64,
    #[case] dt: f64,
    #[case] capacity: usize,
    #[case] clamped: bool,
) {
    let w = window_capacity(persistence, dt);
    assert_eq!(w.capacity, capacity);
    assert_eq!(w.clamped, clamped);
}

#[rstest]
#[case(-50.0, -100.0, 0.5)]
#[case(-150.0, -100.0, 1.0)]
#[case(0.0, -100.0, 0.0)]
#[case(20.0, -100.0, 0.2)]
fn proximity_ratio_cases(#[case] v: f64, #[case] vt: f64, #[case] expected: f64) {
    assert_eq!(proximity_ratio(v, vt), Ok(expected));
}

#[rstest]
#[case(0.05)]
#[case(0.0)]
#[case(f64::NAN)]
fn degenerate_terminal_velocity_is_an_error(#[case] vt: f64) {
    assert!(matches!(
        proximity_ratio(-10.0, vt),
        Err(ProximityError::DegenerateDivisor(_))
    ));
}
