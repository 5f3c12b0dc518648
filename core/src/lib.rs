pub mod config;
pub mod error;
pub mod models;
pub mod stats;

pub use config::{DenoiseConfig, OverlapWeighting, Parallelism};
pub use error::DenoiseError;
pub use models::report::GuardrailReport;
pub use models::series::{DenoiseResult, Diagnostics, WindowBound};
