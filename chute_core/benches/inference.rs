use std::sync::Arc;

use chute_core::{Inputs, Parameters, RuleBase, Sample, run};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

// Synthetic descent: pitch oscillating around a nose-down attitude, speed ramping to terminal.
fn synth_samples(n: usize, dt: f64, seed: u32) -> Vec<Sample> {
    // tiny PRNG
    let mut state = seed.max(1);
    let mut noise = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0) * 2.0 - 1.0
    };
    (0..n)
        .map(|i| {
            let t = i as f64 * dt;
            Sample {
                time_s: t,
                pitch_deg: -30.0 + 20.0 * (t / 3.0).sin() + 2.0 * noise(),
                altitude_m: (1000.0 - 12.0 * t).max(0.0),
                vertical_velocity_mps: (-9.81 * t).max(-14.0) + 0.3 * noise(),
                vertical_accel_mps2: -9.81 + 0.5 * noise(),
            }
        })
        .collect()
}

pub fn bench_infer(c: &mut Criterion) {
    let rb = RuleBase::reference().expect("reference rule base");
    let mut g = c.benchmark_group("infer");
    for (name, inputs) in [
        (
            "dive",
            Inputs {
                severity: 100.0,
                pitch_trend: -60.0,
                proximity: 1.0,
                acceleration: -12.0,
                altitude: 500.0,
            },
        ),
        (
            "level",
            Inputs {
                severity: 0.0,
                pitch_trend: 0.0,
                proximity: 0.0,
                acceleration: 0.0,
                altitude: 100.0,
            },
        ),
    ] {
        g.bench_function(name, |b| b.iter(|| rb.infer(black_box(&inputs))));
    }
    g.finish();
}

pub fn bench_run(c: &mut Criterion) {
    let rb = Arc::new(RuleBase::reference().expect("reference rule base"));
    let samples = synth_samples(2_000, 0.05, 0xC0FFEE);
    c.bench_function("run_2000_samples", |b| {
        b.iter_batched(
            || rb.clone(),
            |rb| run(black_box(&samples), &Parameters::default(), rb),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(inference, bench_infer, bench_run);
criterion_main!(inference);
