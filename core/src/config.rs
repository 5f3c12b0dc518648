use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DenoiseError;

/// How many workers solve windows concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ParallelismRepr", into = "ParallelismRepr")]
pub enum Parallelism {
    /// A fixed number of workers. `Workers(1)` is fully sequential.
    Workers(usize),
    /// One worker per available compute unit.
    All,
}

impl Parallelism {
    pub const SEQUENTIAL: Parallelism = Parallelism::Workers(1);

    pub fn is_sequential(&self) -> bool {
        matches!(self, Parallelism::Workers(1))
    }
}

impl Default for Parallelism {
    fn default() -> Self {
        Self::SEQUENTIAL
    }
}

impl fmt::Display for Parallelism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parallelism::Workers(n) => write!(f, "{n}"),
            Parallelism::All => f.write_str("all"),
        }
    }
}

impl FromStr for Parallelism {
    type Err = DenoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" | "-1" => Ok(Parallelism::All),
            other => match other.parse::<usize>() {
                Ok(0) => Err(DenoiseError::invalid_config(
                    "parallelism",
                    "worker count must be at least 1",
                )),
                Ok(n) => Ok(Parallelism::Workers(n)),
                Err(_) => Err(DenoiseError::invalid_config(
                    "parallelism",
                    format!("expected a positive integer or \"all\", got {other:?}"),
                )),
            },
        }
    }
}

/// Persisted form: a bare integer or the keyword `"all"`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ParallelismRepr {
    Count(usize),
    Keyword(String),
}

impl From<Parallelism> for ParallelismRepr {
    fn from(p: Parallelism) -> Self {
        match p {
            Parallelism::Workers(n) => ParallelismRepr::Count(n),
            Parallelism::All => ParallelismRepr::Keyword("all".to_string()),
        }
    }
}

impl TryFrom<ParallelismRepr> for Parallelism {
    type Error = String;

    fn try_from(repr: ParallelismRepr) -> Result<Self, Self::Error> {
        match repr {
            ParallelismRepr::Count(0) => Err("parallelism must be at least 1".to_string()),
            ParallelismRepr::Count(n) => Ok(Parallelism::Workers(n)),
            ParallelismRepr::Keyword(k) if k == "all" => Ok(Parallelism::All),
            ParallelismRepr::Keyword(k) => Err(format!("unknown parallelism keyword {k:?}")),
        }
    }
}

/// Weight each window contributes per sample during overlap-add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapWeighting {
    /// Uniform weight 1.0. Keeps the lambda = 0 identity exact.
    #[default]
    Flat,
    /// Symmetric Hann taper; end-points carry zero weight.
    Hann,
}

impl fmt::Display for OverlapWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapWeighting::Flat => f.write_str("flat"),
            OverlapWeighting::Hann => f.write_str("hann"),
        }
    }
}

impl FromStr for OverlapWeighting {
    type Err = DenoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(OverlapWeighting::Flat),
            "hann" | "hanning" => Ok(OverlapWeighting::Hann),
            other => Err(DenoiseError::invalid_config(
                "weighting",
                format!("expected \"flat\" or \"hann\", got {other:?}"),
            )),
        }
    }
}

/// Immutable parameter set for one denoising invocation.
///
/// Covers both strategies (windowed TV and wavelet) plus the guardrail
/// thresholds. The persisted form is flat JSON mirroring these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseConfig {
    // =========================
    // Windowed TV denoiser
    // =========================
    /// Window length over the increment sequence.
    pub window: usize,

    /// Fraction of each window shared with the next, in [0, 1).
    pub overlap: f64,

    /// Total-variation regularisation strength. Zero is the identity.
    pub lambda: f64,

    /// Proximal iterations per window.
    pub max_iters: usize,

    pub parallelism: Parallelism,

    pub weighting: OverlapWeighting,

    // =========================
    // Wavelet denoiser
    // =========================
    /// Wavelet family name (`haar`, `db1` .. `db4`).
    pub wavelet: String,

    /// Levels subtracted from the maximum feasible decomposition depth.
    pub level_reduction: usize,

    /// Scale applied to every detail-band threshold.
    pub alpha: f64,

    pub volatility_adaptive: bool,

    /// Rolling window (samples) for realised volatility.
    pub volatility_window: usize,

    pub apply_lowpass: bool,

    /// Cutoff of the zero-phase post-filter, relative to `sampling_rate_hz`.
    pub lowpass_cutoff_hz: f64,

    pub lowpass_taps: usize,

    pub sampling_rate_hz: f64,

    // =========================
    // Guardrails
    // =========================
    /// Frequency splitting "low" from "high" band power.
    pub lowfreq_split_hz: f64,

    pub min_correlation: f64,

    pub min_trend_agreement: f64,

    pub min_lowfreq_preserve: f64,

    // =========================
    // Caller-side preprocessing
    // =========================
    /// Standardise prices before denoising and undo it on the final output.
    pub standardize: bool,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            window: 150,
            overlap: 0.5,
            lambda: 0.5,
            max_iters: 80,
            parallelism: Parallelism::SEQUENTIAL,
            weighting: OverlapWeighting::Flat,

            wavelet: "db4".to_string(),
            level_reduction: 2,
            alpha: 1.0,
            volatility_adaptive: true,
            volatility_window: 60,
            apply_lowpass: false,
            lowpass_cutoff_hz: 0.01,
            lowpass_taps: 101,
            sampling_rate_hz: 1.0,

            lowfreq_split_hz: 0.003,
            min_correlation: 0.85,
            min_trend_agreement: 0.9,
            min_lowfreq_preserve: 0.95,

            standardize: true,
        }
    }
}

impl DenoiseConfig {
    /// Checks every field against its documented range.
    pub fn validate(&self) -> Result<(), DenoiseError> {
        if self.window == 0 {
            return Err(DenoiseError::invalid_config("window", "must be > 0"));
        }
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(DenoiseError::InvalidOverlap(self.overlap));
        }
        non_negative("lambda", self.lambda)?;
        if self.max_iters == 0 {
            return Err(DenoiseError::invalid_config("max_iters", "must be >= 1"));
        }
        if self.parallelism == Parallelism::Workers(0) {
            return Err(DenoiseError::invalid_config(
                "parallelism",
                "worker count must be at least 1",
            ));
        }
        if self.wavelet.trim().is_empty() {
            return Err(DenoiseError::invalid_config("wavelet", "must not be empty"));
        }
        non_negative("alpha", self.alpha)?;
        if self.volatility_window == 0 {
            return Err(DenoiseError::invalid_config("volatility_window", "must be > 0"));
        }
        positive("lowpass_cutoff_hz", self.lowpass_cutoff_hz)?;
        if self.lowpass_taps == 0 {
            return Err(DenoiseError::invalid_config("lowpass_taps", "must be >= 1"));
        }
        positive("sampling_rate_hz", self.sampling_rate_hz)?;
        positive("lowfreq_split_hz", self.lowfreq_split_hz)?;
        unit_interval("min_correlation", self.min_correlation)?;
        unit_interval("min_trend_agreement", self.min_trend_agreement)?;
        unit_interval("min_lowfreq_preserve", self.min_lowfreq_preserve)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, DenoiseError> {
        serde_json::to_string_pretty(self).map_err(|e| DenoiseError::json("serialize config", e))
    }

    pub fn from_json(data: &str) -> Result<Self, DenoiseError> {
        let cfg: Self =
            serde_json::from_str(data).map_err(|e| DenoiseError::json("parse config", e))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persists the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DenoiseError> {
        let data = self.to_json()?;
        std::fs::write(path, data).map_err(|e| DenoiseError::io("write config", e))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DenoiseError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| DenoiseError::io("read config", e))?;
        Self::from_json(&data)
    }
}

fn non_negative(field: &'static str, v: f64) -> Result<(), DenoiseError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(DenoiseError::invalid_config(field, format!("must be finite and >= 0, got {v}")))
    }
}

fn positive(field: &'static str, v: f64) -> Result<(), DenoiseError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(DenoiseError::invalid_config(field, format!("must be finite and > 0, got {v}")))
    }
}

fn unit_interval(field: &'static str, v: f64) -> Result<(), DenoiseError> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(DenoiseError::invalid_config(field, format!("must be in [0, 1], got {v}")))
    }
}
