//! Windowed TV denoiser: the primary entry point.
//!
//! ```text
//! prices -> increments -> windows -> per-window TV solve -> overlap-add -> prices
//! ```
//!
//! The algorithm touches only differences, so it is equivariant to any
//! affine rescaling of the input. With `lambda == 0` it returns the input
//! unchanged (to floating-point tolerance) for every window and overlap.

use corelib::{
    DenoiseConfig, DenoiseError, DenoiseResult, Diagnostics, OverlapWeighting, Parallelism,
    WindowBound,
};
use tracing::{Span, debug, field, instrument};

use crate::increments::{from_increments, to_increments};
use crate::overlap_add::{OverlapAdd, window_weights};
use crate::pool::{WindowExecutor, executor_for};
use crate::strategy::Denoiser;
use crate::tv::proximal_tv;
use crate::windowing::sliding_windows;

pub const STRATEGY_NAME: &str = "windowed-tv";

/// Parameters of the windowed TV solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TvParams {
    pub window: usize,
    pub overlap: f64,
    pub lambda: f64,
    pub max_iters: usize,
    pub weighting: OverlapWeighting,
}

impl TvParams {
    pub fn from_config(cfg: &DenoiseConfig) -> Self {
        Self {
            window: cfg.window,
            overlap: cfg.overlap,
            lambda: cfg.lambda,
            max_iters: cfg.max_iters,
            weighting: cfg.weighting,
        }
    }
}

/// Denoise `values` with flat overlap-add weighting.
///
/// Builds a worker pool for `parallelism`; use [`denoise_with_executor`] to
/// supply one.
pub fn denoise(
    values: &[f64],
    window: usize,
    overlap: f64,
    lambda: f64,
    max_iters: usize,
    parallelism: Parallelism,
) -> Result<DenoiseResult, DenoiseError> {
    if values.is_empty() {
        return Ok(DenoiseResult::empty(STRATEGY_NAME));
    }

    let params = TvParams {
        window,
        overlap,
        lambda,
        max_iters,
        weighting: OverlapWeighting::Flat,
    };
    let executor = executor_for(parallelism)?;
    denoise_with_executor(values, &params, executor.as_ref())
}

/// Denoise `values` on an injected executor.
#[instrument(
    target = "denoise",
    skip(values, executor),
    fields(n = values.len(), workers = executor.workers(), windows = field::Empty)
)]
pub fn denoise_with_executor(
    values: &[f64],
    params: &TvParams,
    executor: &dyn WindowExecutor,
) -> Result<DenoiseResult, DenoiseError> {
    let n = values.len();
    if n == 0 {
        return Ok(DenoiseResult::empty(STRATEGY_NAME));
    }

    validate_input(values, params)?;

    let increments = to_increments(values);
    assert_eq!(increments.len(), n, "increment length does not match input");

    let bounds = sliding_windows(n, params.window, params.overlap)?;
    Span::current().record("windows", bounds.len());
    debug!(windows = bounds.len(), "computed window set");

    let lambda = params.lambda;
    let iters = params.max_iters.max(1);
    let fitted = executor.map_windows(&bounds, &|b: WindowBound| {
        proximal_tv(&increments[b.start..b.end], lambda, iters)
    });
    assert_eq!(fitted.len(), bounds.len(), "executor dropped window results");

    let mut acc = OverlapAdd::new(n);
    for (bound, local) in bounds.iter().zip(&fitted) {
        let weights = window_weights(bound.len(), params.weighting);
        acc.accumulate(*bound, local, &weights);
    }
    let aggregated = acc.finish(&increments);
    assert_eq!(aggregated.len(), n, "aggregated increment length does not match input");

    let denoised = from_increments(values[0], &aggregated);
    assert_eq!(denoised.len(), n, "reconstructed length does not match input");
    assert!(
        denoised[0] == values[0],
        "reconstruction moved the baseline: {} != {}",
        denoised[0],
        values[0]
    );

    debug!(lambda, iters, "windowed denoise complete");

    Ok(DenoiseResult {
        denoised,
        diagnostics: Diagnostics {
            strategy: STRATEGY_NAME,
            windows: bounds.len(),
            workers: executor.workers(),
            wavelet_level: None,
            volatility_scale: None,
        },
    })
}

fn validate_input(values: &[f64], params: &TvParams) -> Result<(), DenoiseError> {
    if !(params.lambda.is_finite() && params.lambda >= 0.0) {
        return Err(DenoiseError::invalid_config(
            "lambda",
            format!("must be finite and >= 0, got {}", params.lambda),
        ));
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(DenoiseError::NonFiniteInput { index });
    }
    Ok(())
}

/// [`Denoiser`] backed by the windowed TV solve.
pub struct WindowedTvDenoiser {
    params: TvParams,
    executor: Box<dyn WindowExecutor>,
}

impl WindowedTvDenoiser {
    pub fn new(params: TvParams, executor: Box<dyn WindowExecutor>) -> Self {
        Self { params, executor }
    }

    pub fn from_config(cfg: &DenoiseConfig) -> Result<Self, DenoiseError> {
        cfg.validate()?;
        Ok(Self::new(TvParams::from_config(cfg), executor_for(cfg.parallelism)?))
    }

    pub fn params(&self) -> &TvParams {
        &self.params
    }
}

impl Denoiser for WindowedTvDenoiser {
    fn name(&self) -> &'static str {
        STRATEGY_NAME
    }

    fn denoise(&self, values: &[f64]) -> Result<DenoiseResult, DenoiseError> {
        denoise_with_executor(values, &self.params, self.executor.as_ref())
    }
}
