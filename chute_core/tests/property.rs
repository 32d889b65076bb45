use std::sync::Arc;

use chute_core::severity::SeverityEstimator;
use chute_core::trigger::{TriggerPhase, TriggerStateMachine};
use chute_core::{
    Inputs, MembershipFunction, Parameters, PidGains, RuleBase, RuleExpr, Sample, TriggerCfg,
    run,
};
use proptest::prelude::*;

prop_compose! {
    fn triangle()(a in -100.0f64..100.0, w1 in 0.0f64..50.0, w2 in 0.0f64..50.0)
        -> (f64, f64, f64) {
        (a, a + w1, a + w1 + w2)
    }
}

prop_compose! {
    fn inputs()(
        severity in -10.0f64..110.0,
        pitch_trend in -120.0f64..120.0,
        proximity in -0.2f64..1.2,
        acceleration in -20.0f64..10.0,
        altitude in -100.0f64..1500.0,
    ) -> Inputs {
        Inputs { severity, pitch_trend, proximity, acceleration, altitude }
    }
}

prop_compose! {
    fn samples()(
        len in 2usize..120,
        dt in 0.05f64..1.0,
    )(
        pitch in proptest::collection::vec(-90.0f64..90.0, len),
        v in proptest::collection::vec(-30.0f64..10.0, len),
        a in proptest::collection::vec(-15.0f64..5.0, len),
        alt in proptest::collection::vec(0.0f64..1200.0, len),
        dt in Just(dt),
    ) -> Vec<Sample> {
        (0..pitch.len())
            .map(|i| Sample {
                time_s: i as f64 * dt,
                pitch_deg: pitch[i],
                altitude_m: alt[i],
                vertical_velocity_mps: v[i],
                vertical_accel_mps2: a[i],
            })
            .collect()
    }
}

proptest! {
    #[test]
    fn membership_degree_is_bounded((l, p, r) in triangle(), x in -300.0f64..300.0) {
        let mf = MembershipFunction::triangular(l, p, r).unwrap();
        let d = mf.degree(x);
        prop_assert!((0.0..=1.0).contains(&d));
        prop_assert_eq!(mf.degree(p), 1.0);
    }

    #[test]
    fn connectives_follow_min_max_complement(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        use chute_core::InputVar::{Altitude, Severity};
        let leaf = |v: chute_core::InputVar, _: &str| if v == Severity { a } else { b };
        let x = RuleExpr::is(Severity, "x");
        let y = RuleExpr::is(Altitude, "y");
        prop_assert_eq!(RuleExpr::and([x.clone(), y.clone()]).eval(&leaf), a.min(b));
        prop_assert_eq!(RuleExpr::or([x.clone(), y]).eval(&leaf), a.max(b));
        prop_assert_eq!(RuleExpr::not(x).eval(&leaf), 1.0 - a);
    }

    #[test]
    fn risk_stays_in_output_universe(i in inputs()) {
        let rb = RuleBase::reference().unwrap();
        if let Ok(inf) = rb.infer(&i) {
            prop_assert!((0.0..=100.0).contains(&inf.risk), "risk {}", inf.risk);
            prop_assert!(inf.strengths.iter().all(|s| (0.0..=1.0).contains(s)));
        }
    }

    #[test]
    fn pid_output_is_bounded_and_state_finite(
        v in proptest::collection::vec(-60.0f64..60.0, 1..500),
        dt in 0.01f64..1.0,
    ) {
        let mut pid = SeverityEstimator::new(PidGains::default());
        for x in v {
            let out = pid.update(x, dt);
            prop_assert!((0.0..=100.0).contains(&out));
        }
        prop_assert!(pid.state().integral.is_finite());
    }

    #[test]
    fn fired_never_reverts(risks in proptest::collection::vec(0.0f64..100.0, 1..200)) {
        let mut m = TriggerStateMachine::new(TriggerCfg::default());
        let mut fired = false;
        for (i, r) in risks.iter().enumerate() {
            m.update(*r, 0.1, i as f64 * 0.1);
            if fired {
                prop_assert_eq!(m.phase(), TriggerPhase::Fired);
            }
            fired = m.phase() == TriggerPhase::Fired;
        }
    }

    #[test]
    fn runs_are_deterministic(s in samples()) {
        let rb = Arc::new(RuleBase::reference().unwrap());
        let a = run(&s, &Parameters::default(), rb.clone()).unwrap();
        let b = run(&s, &Parameters::default(), rb).unwrap();
        prop_assert_eq!(a.steps, b.steps);
        prop_assert_eq!(a.decision, b.decision);
    }
}
