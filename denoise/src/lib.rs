//! Increment-domain denoisers for irregular price series.
//!
//! Two strategies share one contract (prices in, same-length prices out):
//! - [`windowed`]: total-variation proximal solve on overlapping windows of
//!   increments, stitched back with overlap-add.
//! - [`wavelet`]: single-pass multiresolution shrinkage with an optional
//!   zero-phase low-pass.

pub mod increments;
pub mod lowpass;
pub mod overlap_add;
pub mod pool;
pub mod shrink;
pub mod strategy;
pub mod tv;
pub mod wavelet;
pub mod windowed;
pub mod windowing;

pub use pool::{RayonExecutor, SequentialExecutor, WindowExecutor, executor_for};
pub use strategy::{Denoiser, DenoiserKind};
pub use wavelet::{WaveletDenoiser, WaveletParams, wavelet_denoise};
pub use windowed::{TvParams, WindowedTvDenoiser, denoise, denoise_with_executor};
pub use windowing::sliding_windows;
