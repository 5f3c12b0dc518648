use corelib::Parallelism;
use denoise::{denoise, sliding_windows};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

fn walk(start: f64, steps: &[f64]) -> Vec<f64> {
    let mut level = start;
    steps
        .iter()
        .map(|s| {
            level += s;
            level
        })
        .collect()
}

fn squared_increments(x: &[f64]) -> f64 {
    x.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn windows_cover_every_index(
        n in 1usize..2_000,
        window in 1usize..400,
        overlap in 0.0f64..0.95,
    ) {
        let bounds = sliding_windows(n, window, overlap).unwrap();
        prop_assert!(!bounds.is_empty());
        prop_assert_eq!(bounds[0].start, 0);
        prop_assert_eq!(bounds.last().unwrap().end, n);

        let mut covered = vec![false; n];
        for b in &bounds {
            prop_assert!(b.start < b.end && b.end <= n);
            prop_assert!(b.len() <= window.max(1));
            covered[b.start..b.end].iter_mut().for_each(|c| *c = true);
        }
        prop_assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn output_keeps_length_and_baseline(
        steps in prop::collection::vec(-1.0f64..1.0, 1..300),
        window in 1usize..80,
        overlap in 0.0f64..0.95,
        lambda in 0.0f64..3.0,
    ) {
        let x = walk(100.0, &steps);
        let res = denoise(&x, window, overlap, lambda, 30, Parallelism::SEQUENTIAL).unwrap();
        prop_assert_eq!(res.denoised.len(), x.len());
        prop_assert_eq!(res.denoised[0], x[0]);
        prop_assert!(res.denoised.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn zero_lambda_is_identity(
        steps in prop::collection::vec(-1.0f64..1.0, 1..300),
        window in 1usize..80,
        overlap in 0.0f64..0.95,
    ) {
        let x = walk(50.0, &steps);
        let res = denoise(&x, window, overlap, 0.0, 30, Parallelism::SEQUENTIAL).unwrap();
        for (a, b) in res.denoised.iter().zip(&x) {
            prop_assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
        }
    }

    #[test]
    fn shifting_the_input_shifts_the_output(
        steps in prop::collection::vec(-1.0f64..1.0, 2..200),
        shift in -1_000.0f64..1_000.0,
        lambda in 0.0f64..2.0,
    ) {
        let x = walk(10.0, &steps);
        let shifted: Vec<f64> = x.iter().map(|v| v + shift).collect();

        let a = denoise(&x, 40, 0.5, lambda, 40, Parallelism::SEQUENTIAL).unwrap();
        let b = denoise(&shifted, 40, 0.5, lambda, 40, Parallelism::SEQUENTIAL).unwrap();
        for (u, v) in a.denoised.iter().zip(&b.denoised) {
            prop_assert!((u + shift - v).abs() < 1e-8);
        }
    }

    #[test]
    fn scaling_input_and_lambda_scales_the_output(
        steps in prop::collection::vec(-1.0f64..1.0, 2..200),
        scale in 0.5f64..4.0,
        lambda in 0.0f64..2.0,
    ) {
        let x = walk(0.0, &steps);
        let scaled: Vec<f64> = x.iter().map(|v| v * scale).collect();

        let a = denoise(&x, 40, 0.5, lambda, 40, Parallelism::SEQUENTIAL).unwrap();
        let b = denoise(&scaled, 40, 0.5, lambda * scale, 40, Parallelism::SEQUENTIAL).unwrap();
        for (u, v) in a.denoised.iter().zip(&b.denoised) {
            prop_assert!((u * scale - v).abs() < 1e-8 * scale.max(1.0) * (1.0 + u.abs()));
        }
    }
}

#[test]
fn denoising_does_not_add_increment_energy() {
    let mut rng = StdRng::seed_from_u64(7);
    let drift = Normal::new(0.0, 0.01).unwrap();
    let noise = Normal::new(0.0, 0.05).unwrap();

    let steps: Vec<f64> = (0..2_000).map(|_| drift.sample(&mut rng)).collect();
    let x: Vec<f64> = walk(100.0, &steps)
        .into_iter()
        .map(|v| v + noise.sample(&mut rng))
        .collect();

    let res = denoise(&x, 20, 0.5, 1.0, 50, Parallelism::SEQUENTIAL).unwrap();
    assert_eq!(res.denoised.len(), x.len());
    assert!(squared_increments(&res.denoised) <= squared_increments(&x) + 1e-9);
}

#[test]
fn worker_count_does_not_change_the_result() {
    let mut rng = StdRng::seed_from_u64(11);
    let step = Normal::new(0.0, 0.2).unwrap();
    let steps: Vec<f64> = (0..1_500).map(|_| step.sample(&mut rng)).collect();
    let x = walk(20.0, &steps);

    let seq = denoise(&x, 120, 0.5, 0.8, 40, Parallelism::SEQUENTIAL).unwrap();
    for workers in [Parallelism::Workers(2), Parallelism::Workers(4), Parallelism::All] {
        let par = denoise(&x, 120, 0.5, 0.8, 40, workers).unwrap();
        assert_eq!(seq.denoised, par.denoised, "{workers}");
        assert_eq!(seq.diagnostics.windows, par.diagnostics.windows);
    }
}

#[test]
fn empty_and_single_sample_inputs() {
    let empty = denoise(&[], 10, 0.5, 1.0, 10, Parallelism::SEQUENTIAL).unwrap();
    assert!(empty.is_empty());

    let one = denoise(&[3.5], 10, 0.5, 1.0, 10, Parallelism::SEQUENTIAL).unwrap();
    assert_eq!(one.denoised, vec![3.5]);
}
