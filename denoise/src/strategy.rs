use std::fmt;
use std::str::FromStr;

use corelib::{DenoiseConfig, DenoiseError, DenoiseResult};

use crate::wavelet::WaveletDenoiser;
use crate::windowed::WindowedTvDenoiser;

/// A denoising strategy: prices in, same-length prices out.
///
/// Implementations hold only immutable parameters; calling `denoise`
/// never changes their state.
pub trait Denoiser: Send + Sync {
    fn name(&self) -> &'static str;

    fn denoise(&self, values: &[f64]) -> Result<DenoiseResult, DenoiseError>;
}

/// Selects a [`Denoiser`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DenoiserKind {
    #[default]
    WindowedTv,
    Wavelet,
}

impl DenoiserKind {
    pub fn build(self, cfg: &DenoiseConfig) -> Result<Box<dyn Denoiser>, DenoiseError> {
        match self {
            DenoiserKind::WindowedTv => Ok(Box::new(WindowedTvDenoiser::from_config(cfg)?)),
            DenoiserKind::Wavelet => Ok(Box::new(WaveletDenoiser::from_config(cfg)?)),
        }
    }
}

impl fmt::Display for DenoiserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenoiserKind::WindowedTv => f.write_str("tv"),
            DenoiserKind::Wavelet => f.write_str("wavelet"),
        }
    }
}

impl FromStr for DenoiserKind {
    type Err = DenoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tv" | "windowed-tv" => Ok(DenoiserKind::WindowedTv),
            "wavelet" => Ok(DenoiserKind::Wavelet),
            other => Err(DenoiseError::invalid_config(
                "strategy",
                format!("expected \"tv\" or \"wavelet\", got {other:?}"),
            )),
        }
    }
}
