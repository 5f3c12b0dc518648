use thiserror::Error;

/// Recoverable failures of the denoising core.
///
/// Internal-consistency violations (length mismatches between increments,
/// aggregates and reconstruction) are not represented here: they are bugs
/// and abort through assertions.
#[derive(Debug, Error)]
pub enum DenoiseError {
    #[error("overlap must be in [0, 1), got {0}")]
    InvalidOverlap(f64),

    #[error("invalid configuration field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("input value at index {index} is not finite")]
    NonFiniteInput { index: usize },

    #[error("unknown wavelet family: {0}")]
    UnknownWavelet(String),

    #[error("series of length {len} is too short, need at least {min} samples")]
    SeriesTooShort { len: usize, min: usize },

    #[error("worker pool failed: {0}")]
    WorkerPool(String),

    #[error("parameter search grid is empty")]
    EmptySearchGrid,

    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl DenoiseError {
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    pub fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }
}
