use serde::Serialize;

/// Half-open index range `[start, end)` over an increment sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WindowBound {
    pub start: usize,
    pub end: usize,
}

impl WindowBound {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

impl From<(usize, usize)> for WindowBound {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

/// Run-level diagnostics attached to every denoised series.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Diagnostics {
    /// Strategy that produced the series.
    pub strategy: &'static str,

    /// Number of windows solved (zero for empty input and the wavelet path).
    pub windows: usize,

    /// Workers that executed the per-window solves.
    pub workers: usize,

    /// Decomposition depth actually used (wavelet path only).
    pub wavelet_level: Option<usize>,

    /// Volatility multiplier applied to thresholds (wavelet path only).
    pub volatility_scale: Option<f64>,
}

/// Denoised prices plus diagnostics. Owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DenoiseResult {
    pub denoised: Vec<f64>,
    pub diagnostics: Diagnostics,
}

impl DenoiseResult {
    pub fn empty(strategy: &'static str) -> Self {
        Self {
            denoised: Vec::new(),
            diagnostics: Diagnostics {
                strategy,
                ..Default::default()
            },
        }
    }

    pub fn len(&self) -> usize {
        self.denoised.len()
    }

    pub fn is_empty(&self) -> bool {
        self.denoised.is_empty()
    }
}
