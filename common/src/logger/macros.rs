use tracing::{Level, Span};

use super::RunId;

/// Root span for one denoising run.
pub fn run_span(name: &'static str, run_id: &RunId) -> Span {
    tracing::span!(
        Level::INFO,
        "run",
        name = name,
        run_id = %run_id
    )
}

/// Child span for a pipeline stage (inherits run_id from the parent).
pub fn stage_span(name: &'static str) -> Span {
    tracing::span!(Level::INFO, "stage", name = name)
}
