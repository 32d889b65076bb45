use chute_core::inference::centroid;
use chute_core::{FuzzyError, InputVar, Inputs, MembershipFunction, RuleBase, Universe};
use rstest::{fixture, rstest};

#[fixture]
fn rules() -> RuleBase {
    RuleBase::reference().unwrap()
}

#[test]
fn centroid_of_symmetric_triangle_is_its_peak() {
    let u = Universe::range(0.0, 100.0, 1.0).unwrap();
    let mf = MembershipFunction::triangular(20.0, 50.0, 80.0).unwrap();
    let c = centroid(&u, &mf.sample(&u)).unwrap();
    assert!((c - 50.0).abs() < 1e-9, "centroid {c}");
}

#[test]
fn centroid_of_empty_set_is_none() {
    let u = Universe::range(0.0, 100.0, 1.0).unwrap();
    assert_eq!(centroid(&u, &vec![0.0; u.len()]), None);
}

#[rstest]
fn steep_dive_is_high_risk(rules: RuleBase) {
    let inf = rules
        .infer(&Inputs {
            severity: 100.0,
            pitch_trend: -60.0,
            proximity: 1.0,
            acceleration: -12.0,
            altitude: 500.0,
        })
        .unwrap();
    assert!((inf.risk - 89.2896).abs() < 1e-3, "risk {}", inf.risk);
    // Rules 1 and 2 fire at the negative-trend degree, the rest stay off.
    assert!((inf.strengths[0] - 52.0 / 82.0).abs() < 1e-9);
    assert!((inf.strengths[1] - 52.0 / 82.0).abs() < 1e-9);
    assert_eq!(&inf.strengths[2..], &[0.0, 0.0, 0.0]);
}

#[rstest]
fn level_flight_is_low_risk(rules: RuleBase) {
    let inf = rules
        .infer(&Inputs {
            severity: 0.0,
            pitch_trend: 0.0,
            proximity: 0.0,
            acceleration: 0.0,
            altitude: 100.0,
        })
        .unwrap();
    // Baixo fully active: centroid of [0, 0, 40] on an integer grid.
    assert!((inf.risk - 13.0).abs() < 1e-9, "risk {}", inf.risk);
    assert_eq!(inf.strengths[3], 1.0);
}

#[rstest]
#[case::neutral_trend_mid_proximity(100.0, 0.0, 0.55)]
#[case::shallow_negative_trend(0.0, -20.0, 0.3)]
fn uncovered_input_region_reports_no_active_rule(
    rules: RuleBase,
    #[case] severity: f64,
    #[case] pitch_trend: f64,
    #[case] proximity: f64,
) {
    let res = rules.infer(&Inputs {
        severity,
        pitch_trend,
        proximity,
        acceleration: 0.0,
        altitude: 500.0,
    });
    assert_eq!(res, Err(FuzzyError::NoActiveRule));
}

#[rstest]
fn aggregate_clips_and_takes_pointwise_max(rules: RuleBase) {
    // rules 1 and 2 both conclude Alto (70, 100, 100)
    let agg = rules.aggregate(&[0.5, 0.8, 0.0, 0.0, 0.0]);
    assert_eq!(agg.len(), 101);
    assert!(agg[..=70].iter().all(|&m| m == 0.0));
    assert_eq!(agg[85], 0.5);
    assert_eq!(agg[100], 0.8);
    let c = centroid(rules.output().universe(), &agg).unwrap();
    assert!(c > 70.0 && c <= 100.0, "centroid {c}");
}

#[rstest]
fn fuzzify_exposes_named_degrees(rules: RuleBase) {
    let f = rules.fuzzify(&Inputs {
        severity: 80.0,
        pitch_trend: 0.0,
        proximity: 0.8,
        acceleration: 0.0,
        altitude: 1500.0,
    });
    assert_eq!(f.degree(InputVar::PitchTrend, "Neutro"), 1.0);
    assert!((f.degree(InputVar::Severity, "Crítico") - 0.5).abs() < 1e-12);
    assert!((f.degree(InputVar::Proximity, "Alta") - 0.5).abs() < 1e-9);
    // clamped to the universe end
    assert_eq!(f.degree(InputVar::Altitude, "Alta"), 1.0);
    assert_eq!(f.degree(InputVar::Altitude, "Nope"), 0.0);
}

#[rstest]
fn aggregation_clips_and_takes_pointwise_max(rules: RuleBase) {
    let agg = rules.aggregate(&[0.0, 0.4, 0.0, 0.0, 0.0]);
    assert!(agg.iter().all(|&m| m <= 0.4));
    assert_eq!(agg[100], 0.4);
    assert_eq!(agg[0], 0.0);
}
