//! Total-variation proximal solver for one window of increments.
//!
//! Minimises `0.5 * ||v - original||^2 + lambda * TV(v)`, where `TV` sums
//! the absolute first differences of `v`. Penalising changes in the
//! instantaneous increment smooths price curvature without moving the level.

use crate::shrink::soft_threshold;

/// Fixed gradient step.
pub const STEP: f64 = 0.5;

/// Denoise one window of increments.
///
/// Each round:
/// 1. gradient step towards `original`
/// 2. soft-threshold the first differences by `STEP * lambda`
/// 3. re-integrate the differences starting from `original[0]`
///
/// `lambda == 0` returns `original` untouched. `iters` is raised to 1.
pub fn proximal_tv(original: &[f64], lambda: f64, iters: usize) -> Vec<f64> {
    if lambda == 0.0 || original.is_empty() {
        return original.to_vec();
    }

    let tau = STEP * lambda;
    let mut v = original.to_vec();
    let mut shrunk = vec![0.0; v.len()];

    for _ in 0..iters.max(1) {
        for (vk, ok) in v.iter_mut().zip(original) {
            *vk -= STEP * (*vk - ok);
        }

        for k in 1..v.len() {
            shrunk[k] = soft_threshold(v[k] - v[k - 1], tau);
        }

        // v[0] is pinned so the window cannot drift off its own baseline.
        v[0] = original[0];
        for k in 1..v.len() {
            v[k] = v[k - 1] + shrunk[k];
        }
    }

    v
}
