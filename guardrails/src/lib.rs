//! Fidelity checks for denoised price series.
//!
//! A denoised series passes when it stays correlated with the original,
//! keeps its local trend direction and its low-frequency power, and leaves a
//! white residual.

pub mod evaluator;
pub mod metrics;
pub mod rough;
pub mod search;
pub mod spectrum;
pub mod trend;
pub mod whiteness;

pub use evaluator::{MIN_WHITENESS_PVALUE, evaluate_guardrails};
pub use rough::{
    RoughMetrics, SIGNATURE_DEPTH, VariationReport, path_rough_metrics, rough_metrics,
    variation_report,
};
pub use search::{SearchGrid, SearchOutcome, search_params};
