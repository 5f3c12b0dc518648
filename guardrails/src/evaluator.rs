use corelib::{DenoiseConfig, GuardrailReport};
use tracing::{debug, instrument};

use crate::metrics::{pearson, rmse};
use crate::spectrum::lowfreq_preserve;
use crate::trend::{TREND_WINDOW, rolling_slope, sign_agreement};
use crate::whiteness::{LJUNG_BOX_LAGS, ljung_box_pvalue};

/// Residuals with a smaller Ljung-Box p-value are not white.
pub const MIN_WHITENESS_PVALUE: f64 = 0.05;

/// Score `denoised` against `original` and check every guardrail in `cfg`.
///
/// Both series must have the same length.
#[instrument(target = "guardrails", skip_all, fields(n = original.len()))]
pub fn evaluate_guardrails(
    original: &[f64],
    denoised: &[f64],
    cfg: &DenoiseConfig,
) -> GuardrailReport {
    assert_eq!(
        original.len(),
        denoised.len(),
        "original and denoised series differ in length"
    );

    let correlation = pearson(original, denoised);
    let rmse = rmse(original, denoised);

    let trend_agreement = sign_agreement(
        &rolling_slope(original, TREND_WINDOW),
        &rolling_slope(denoised, TREND_WINDOW),
    );

    let lowfreq_preserve = lowfreq_preserve(
        original,
        denoised,
        cfg.sampling_rate_hz,
        cfg.lowfreq_split_hz,
    );

    let residual: Vec<f64> = original.iter().zip(denoised).map(|(a, b)| a - b).collect();
    let residual_white_pvalue = ljung_box_pvalue(&residual, LJUNG_BOX_LAGS);

    let passes = correlation >= cfg.min_correlation
        && trend_agreement >= cfg.min_trend_agreement
        && lowfreq_preserve >= cfg.min_lowfreq_preserve
        && residual_white_pvalue >= MIN_WHITENESS_PVALUE;

    debug!(
        correlation,
        rmse,
        trend_agreement,
        lowfreq_preserve,
        residual_white_pvalue,
        passes,
        "guardrails evaluated"
    );

    GuardrailReport {
        correlation,
        rmse,
        trend_agreement,
        lowfreq_preserve,
        residual_white_pvalue,
        passes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + 0.02 * i as f64 + (i as f64 / 50.0).sin())
            .collect()
    }

    #[test]
    fn identical_series_pass() {
        let x = wave(600);
        let r = evaluate_guardrails(&x, &x, &DenoiseConfig::default());
        assert!((r.correlation - 1.0).abs() < 1e-12);
        assert_eq!(r.rmse, 0.0);
        assert_eq!(r.trend_agreement, 1.0);
        assert_eq!(r.lowfreq_preserve, 1.0);
        assert_eq!(r.residual_white_pvalue, 1.0);
        assert!(r.passes);
    }

    #[test]
    fn flat_output_fails() {
        let x = wave(600);
        let y = vec![x[0]; x.len()];
        let r = evaluate_guardrails(&x, &y, &DenoiseConfig::default());
        assert_eq!(r.correlation, 0.0);
        assert!(r.rmse > 0.0);
        assert!(!r.passes);
    }

    #[test]
    fn constant_offset_is_not_white() {
        // Quarter steps keep `v + 0.5` exact, so the residual is exactly constant.
        let x: Vec<f64> = (0..300).map(|i| i as f64 + (i % 17) as f64 * 0.25).collect();
        let y: Vec<f64> = x.iter().map(|v| v + 0.5).collect();
        let r = evaluate_guardrails(&x, &y, &DenoiseConfig::default());
        assert_eq!(r.residual_white_pvalue, 0.0);
        assert_eq!(r.rmse, 0.5);
        assert!((r.correlation - 1.0).abs() < 1e-12);
        assert!(!r.passes);
    }

    #[test]
    fn thresholds_come_from_config() {
        let x = wave(600);
        let strict = DenoiseConfig {
            min_lowfreq_preserve: 1.0,
            min_trend_agreement: 1.0,
            ..Default::default()
        };
        assert!(evaluate_guardrails(&x, &x, &strict).passes);

        let y = vec![x[0]; x.len()];
        let lenient = DenoiseConfig {
            min_correlation: 0.0,
            min_trend_agreement: 0.0,
            min_lowfreq_preserve: 0.0,
            ..Default::default()
        };
        // Still gated by residual whiteness.
        assert!(!evaluate_guardrails(&x, &y, &lenient).passes);
    }
}
