//! Roughness and variation summaries of price paths.

use std::fmt;

use corelib::stats;
use serde::Serialize;

/// Signature truncation depth used when summarising a price path.
pub const SIGNATURE_DEPTH: usize = 2;

/// Sum of squared first differences.
pub fn realized_variance(prices: &[f64]) -> f64 {
    prices.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum()
}

/// `sum |inc|^p`, a proxy for the p-variation of the path.
pub fn pvar_proxy(increments: &[f64], p: f64) -> f64 {
    increments.iter().map(|v| v.abs().powf(p)).sum()
}

/// Moment features standing in for a truncated log-signature.
///
/// `[mean, std, mean|x|]`; depth >= 2 appends `[mean x^2, mean |x|^1.5]`;
/// depth >= 3 appends `mean x^3`.
pub fn truncated_signature_features(increments: &[f64], depth: usize) -> Vec<f64> {
    let n = increments.len().max(1) as f64;
    let avg = |f: &dyn Fn(f64) -> f64| increments.iter().map(|&v| f(v)).sum::<f64>() / n;

    let mut feats = vec![
        stats::mean(increments),
        stats::std_dev(increments),
        avg(&|v| v.abs()),
    ];
    if depth >= 2 {
        feats.push(avg(&|v| v * v));
        feats.push(avg(&|v| v.abs().powf(1.5)));
    }
    if depth >= 3 {
        feats.push(avg(&|v| v * v * v));
    }
    feats
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoughMetrics {
    pub pvar2: f64,
    pub logsig_l2: f64,
    pub mean_abs: f64,
}

impl fmt::Display for RoughMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pvar2: {:.6}, logsig_l2: {:.6}, mean_abs: {:.6}",
            self.pvar2, self.logsig_l2, self.mean_abs
        )
    }
}

pub fn rough_metrics(increments: &[f64], depth: usize) -> RoughMetrics {
    let feats = truncated_signature_features(increments, depth);
    RoughMetrics {
        pvar2: pvar_proxy(increments, 2.0),
        logsig_l2: feats.iter().map(|v| v * v).sum(),
        mean_abs: stats::mean(&increments.iter().map(|v| v.abs()).collect::<Vec<_>>()),
    }
}

/// [`rough_metrics`] over the first differences of a price path.
pub fn path_rough_metrics(prices: &[f64], depth: usize) -> RoughMetrics {
    rough_metrics(&first_differences(prices), depth)
}

fn first_differences(x: &[f64]) -> Vec<f64> {
    x.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Variation of a denoised path relative to its original.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariationReport {
    pub rv_original: f64,
    pub rv_denoised: f64,
    pub rv_reduction: f64,
    pub pvar_original: f64,
    pub pvar_denoised: f64,
    pub pvar_reduction: f64,
}

pub fn variation_report(original: &[f64], denoised: &[f64]) -> VariationReport {
    let rv_original = realized_variance(original);
    let rv_denoised = realized_variance(denoised);
    let pvar_original = pvar_proxy(&first_differences(original), 2.0);
    let pvar_denoised = pvar_proxy(&first_differences(denoised), 2.0);

    VariationReport {
        rv_original,
        rv_denoised,
        rv_reduction: rv_original - rv_denoised,
        pvar_original,
        pvar_denoised,
        pvar_reduction: pvar_original - pvar_denoised,
    }
}

impl fmt::Display for VariationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rv_original: {:.6}", self.rv_original)?;
        writeln!(f, "rv_denoised: {:.6}", self.rv_denoised)?;
        writeln!(f, "rv_reduction: {:.6}", self.rv_reduction)?;
        writeln!(f, "pvar_original: {:.6}", self.pvar_original)?;
        writeln!(f, "pvar_denoised: {:.6}", self.pvar_denoised)?;
        write!(f, "pvar_reduction: {:.6}", self.pvar_reduction)
    }
}
