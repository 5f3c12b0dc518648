//! Wavelet shrinkage denoiser.
//!
//! ```text
//! prices -> wavedec -> BayesShrink per detail band (x alpha x volatility) -> waverec
//!        -> optional zero-phase low-pass -> truncate to input length
//! ```

pub mod dwt;
pub mod filters;
pub mod volatility;

use corelib::{DenoiseConfig, DenoiseError, DenoiseResult, Diagnostics};
use tracing::{debug, instrument};

use crate::lowpass::{LowpassParams, zero_phase_lowpass};
use crate::shrink::{bayes_shrink_threshold, soft_threshold_all};
use crate::strategy::Denoiser;

pub use dwt::{Decomposition, max_level, wavedec, waverec};
pub use filters::Wavelet;

pub const STRATEGY_NAME: &str = "wavelet";

/// Parameters of the wavelet path.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletParams {
    pub wavelet: Wavelet,
    pub level_reduction: usize,
    pub alpha: f64,
    /// Rolling window for the volatility multiplier; `None` disables it.
    pub volatility_window: Option<usize>,
    pub lowpass: Option<LowpassParams>,
}

impl WaveletParams {
    pub fn from_config(cfg: &DenoiseConfig) -> Result<Self, DenoiseError> {
        Ok(Self {
            wavelet: Wavelet::from_name(&cfg.wavelet)?,
            level_reduction: cfg.level_reduction,
            alpha: cfg.alpha,
            volatility_window: cfg.volatility_adaptive.then_some(cfg.volatility_window),
            lowpass: cfg.apply_lowpass.then(|| LowpassParams {
                cutoff_hz: cfg.lowpass_cutoff_hz * cfg.sampling_rate_hz,
                sampling_rate_hz: cfg.sampling_rate_hz,
                taps: cfg.lowpass_taps,
            }),
        })
    }
}

/// Output of one wavelet pass.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletOutput {
    pub denoised: Vec<f64>,
    pub level: usize,
    pub volatility_scale: f64,
}

/// Denoise `x` with the wavelet path.
///
/// Fails with [`DenoiseError::SeriesTooShort`] when `x` cannot support one
/// decomposition level.
#[instrument(target = "denoise", skip(x), fields(n = x.len()))]
pub fn wavelet_denoise(x: &[f64], params: &WaveletParams) -> Result<WaveletOutput, DenoiseError> {
    if let Some(index) = x.iter().position(|v| !v.is_finite()) {
        return Err(DenoiseError::NonFiniteInput { index });
    }

    let max = max_level(x.len(), params.wavelet.dec_len());
    let level = max.saturating_sub(params.level_reduction).max(1);

    let mut dec = wavedec(x, &params.wavelet, level)?;

    let volatility_scale = match params.volatility_window {
        Some(window) => volatility::volatility_scale(x, window),
        None => 1.0,
    };

    for band in dec.details.iter_mut() {
        let thr = bayes_shrink_threshold(band) * params.alpha * volatility_scale;
        *band = soft_threshold_all(band, thr);
    }

    let mut y = waverec(&dec, &params.wavelet);

    if let Some(lp) = &params.lowpass {
        y = zero_phase_lowpass(&y, lp);
    }

    y.resize(x.len(), y.last().copied().unwrap_or(0.0));

    debug!(
        wavelet = params.wavelet.name(),
        max_level = max,
        level,
        volatility_scale,
        "wavelet denoise complete"
    );

    Ok(WaveletOutput {
        denoised: y,
        level,
        volatility_scale,
    })
}

/// [`Denoiser`] backed by wavelet shrinkage.
pub struct WaveletDenoiser {
    params: WaveletParams,
}

impl WaveletDenoiser {
    pub fn new(params: WaveletParams) -> Self {
        Self { params }
    }

    pub fn from_config(cfg: &DenoiseConfig) -> Result<Self, DenoiseError> {
        cfg.validate()?;
        Ok(Self::new(WaveletParams::from_config(cfg)?))
    }

    pub fn params(&self) -> &WaveletParams {
        &self.params
    }
}

impl Denoiser for WaveletDenoiser {
    fn name(&self) -> &'static str {
        STRATEGY_NAME
    }

    fn denoise(&self, values: &[f64]) -> Result<DenoiseResult, DenoiseError> {
        let out = wavelet_denoise(values, &self.params)?;
        Ok(DenoiseResult {
            denoised: out.denoised,
            diagnostics: Diagnostics {
                strategy: STRATEGY_NAME,
                windows: 0,
                workers: 1,
                wavelet_level: Some(out.level),
                volatility_scale: Some(out.volatility_scale),
            },
        })
    }
}
