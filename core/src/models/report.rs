use std::fmt;

use serde::Serialize;

/// Fidelity metrics of a denoised series against its original.
///
/// Derived and read-only; recomputed on every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuardrailReport {
    /// Pearson correlation, 0.0 when either series is (near) constant.
    pub correlation: f64,

    pub rmse: f64,

    /// Fraction of positions whose rolling slopes share a sign.
    pub trend_agreement: f64,

    /// Low-band power of the denoised series relative to the original, capped at 1.
    pub lowfreq_preserve: f64,

    /// Ljung-Box p-value of the residual; 0.0 when it cannot be computed.
    pub residual_white_pvalue: f64,

    pub passes: bool,
}

impl fmt::Display for GuardrailReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "correlation: {:.6}", self.correlation)?;
        writeln!(f, "rmse: {:.6}", self.rmse)?;
        writeln!(f, "trend_agreement: {:.6}", self.trend_agreement)?;
        writeln!(f, "lowfreq_preserve: {:.6}", self.lowfreq_preserve)?;
        writeln!(f, "residual_white_pvalue: {:.6}", self.residual_white_pvalue)?;
        write!(f, "passes: {}", self.passes)
    }
}
