use corelib::DenoiseConfig;
use denoise::{Denoiser, WaveletDenoiser};
use guardrails::search::score;
use guardrails::{SearchGrid, evaluate_guardrails, search_params, variation_report};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

fn noisy_walk(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let step = Normal::new(0.0, 0.05).unwrap();
    let noise = Normal::new(0.0, 0.02).unwrap();
    let mut level = 100.0;
    (0..n)
        .map(|_| {
            level += step.sample(&mut rng);
            level + noise.sample(&mut rng)
        })
        .collect()
}

#[test]
fn wavelet_output_tracks_the_original() {
    let x = noisy_walk(1024, 3);
    let cfg = DenoiseConfig::default();
    let y = WaveletDenoiser::from_config(&cfg)
        .unwrap()
        .denoise(&x)
        .unwrap()
        .denoised;

    let report = evaluate_guardrails(&x, &y, &cfg);
    assert!(report.correlation > 0.9, "{report}");
    assert!(report.rmse < 0.5, "{report}");
    assert!((0.0..=1.0).contains(&report.lowfreq_preserve));

    let variation = variation_report(&x, &y);
    assert!(variation.rv_reduction > 0.0);
}

#[test]
fn search_returns_the_best_candidate() {
    let x = noisy_walk(1024, 5);
    let base = DenoiseConfig::default();
    let grid = SearchGrid::default();

    let best = search_params(&x, &base, &grid).unwrap();
    assert_eq!(best.denoised.len(), x.len());
    assert_eq!(best.score, score(&best.report));
    assert!(grid.alphas.contains(&best.config.alpha));
    assert!(grid.level_reductions.contains(&best.config.level_reduction));
    assert_eq!(best.config.wavelet, base.wavelet);

    // No single candidate beats the winner.
    for alpha in [0.5, 1.5] {
        let trial = DenoiseConfig { alpha, ..base.clone() };
        let y = WaveletDenoiser::from_config(&trial)
            .unwrap()
            .denoise(&x)
            .unwrap()
            .denoised;
        assert!(score(&evaluate_guardrails(&x, &y, &trial)) <= best.score);
    }
}

#[test]
fn single_candidate_grid_is_deterministic() {
    let x = noisy_walk(512, 9);
    let grid = SearchGrid {
        alphas: vec![1.0],
        level_reductions: vec![2],
        lowpass: vec![false],
    };
    let a = search_params(&x, &DenoiseConfig::default(), &grid).unwrap();
    let b = search_params(&x, &DenoiseConfig::default(), &grid).unwrap();
    assert_eq!(a, b);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn report_fields_stay_in_range(
        pairs in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 0..200),
    ) {
        let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let r = evaluate_guardrails(&x, &y, &DenoiseConfig::default());
        prop_assert!((-1.0..=1.0).contains(&r.correlation));
        prop_assert!(r.rmse >= 0.0);
        prop_assert!((0.0..=1.0).contains(&r.trend_agreement));
        prop_assert!((0.0..=1.0).contains(&r.lowfreq_preserve));
        prop_assert!((0.0..=1.0).contains(&r.residual_white_pvalue));
    }
}
