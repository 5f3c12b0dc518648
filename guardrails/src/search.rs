//! Small exhaustive search over wavelet-denoiser settings.

use corelib::{DenoiseConfig, DenoiseError, GuardrailReport};
use denoise::{Denoiser, WaveletDenoiser};
use tracing::{debug, info, instrument};

use crate::evaluator::evaluate_guardrails;

/// Score deducted from candidates that fail any guardrail.
pub const FAIL_PENALTY: f64 = 10.0;

/// Candidate values, explored as a full cartesian product.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchGrid {
    pub alphas: Vec<f64>,
    pub level_reductions: Vec<usize>,
    pub lowpass: Vec<bool>,
}

impl Default for SearchGrid {
    fn default() -> Self {
        Self {
            alphas: vec![0.5, 1.0, 1.5],
            level_reductions: vec![1, 2, 3],
            lowpass: vec![false, true],
        }
    }
}

impl SearchGrid {
    pub fn len(&self) -> usize {
        self.alphas.len() * self.level_reductions.len() * self.lowpass.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Candidate configurations in grid order (alpha outermost).
    fn candidates<'a>(&'a self, base: &'a DenoiseConfig) -> impl Iterator<Item = DenoiseConfig> + 'a {
        self.alphas.iter().flat_map(move |&alpha| {
            self.level_reductions.iter().flat_map(move |&level_reduction| {
                self.lowpass.iter().map(move |&apply_lowpass| DenoiseConfig {
                    alpha,
                    level_reduction,
                    apply_lowpass,
                    ..base.clone()
                })
            })
        })
    }
}

/// Best candidate found by [`search_params`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub denoised: Vec<f64>,
    pub report: GuardrailReport,
    pub config: DenoiseConfig,
    pub score: f64,
}

/// `2 * correlation + trend_agreement - 0.25 * rmse`, minus
/// [`FAIL_PENALTY`] when the candidate fails its guardrails.
pub fn score(report: &GuardrailReport) -> f64 {
    let base = 2.0 * report.correlation + report.trend_agreement - 0.25 * report.rmse;
    if report.passes {
        base
    } else {
        base - FAIL_PENALTY
    }
}

/// Denoise `x` with every grid candidate and keep the best-scoring one.
///
/// Ties keep the earlier candidate.
#[instrument(target = "guardrails", skip(x, base), fields(n = x.len(), candidates = grid.len()))]
pub fn search_params(
    x: &[f64],
    base: &DenoiseConfig,
    grid: &SearchGrid,
) -> Result<SearchOutcome, DenoiseError> {
    if grid.is_empty() {
        return Err(DenoiseError::EmptySearchGrid);
    }

    let mut best: Option<SearchOutcome> = None;
    for trial in grid.candidates(base) {
        let result = WaveletDenoiser::from_config(&trial)?.denoise(x)?;
        let report = evaluate_guardrails(x, &result.denoised, &trial);
        let score = score(&report);

        debug!(
            alpha = trial.alpha,
            level_reduction = trial.level_reduction,
            apply_lowpass = trial.apply_lowpass,
            score,
            passes = report.passes,
            "candidate scored"
        );

        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(SearchOutcome {
                denoised: result.denoised,
                report,
                config: trial,
                score,
            });
        }
    }

    let best = best.ok_or(DenoiseError::EmptySearchGrid)?;
    info!(
        alpha = best.config.alpha,
        level_reduction = best.config.level_reduction,
        apply_lowpass = best.config.apply_lowpass,
        score = best.score,
        passes = best.report.passes,
        "search complete"
    );
    Ok(best)
}
