//! Overlap-add reconstruction of per-window increments.
//!
//! Every window adds `fitted * weight` and `weight` into two global
//! accumulators; the result is their ratio. Accumulation is a single-threaded
//! reduction that runs after all windows are solved.

use std::f64::consts::PI;

use corelib::{OverlapWeighting, WindowBound};

/// Per-sample weights for a window of length `len`.
///
/// `Hann` is the symmetric taper `0.5 - 0.5 cos(2 pi k / (len - 1))`;
/// windows of length <= 2 fall back to flat weights.
pub fn window_weights(len: usize, policy: OverlapWeighting) -> Vec<f64> {
    match policy {
        OverlapWeighting::Hann if len > 2 => {
            let denom = (len - 1) as f64;
            (0..len)
                .map(|k| 0.5 - 0.5 * (2.0 * PI * k as f64 / denom).cos())
                .collect()
        }
        _ => vec![1.0; len],
    }
}

pub struct OverlapAdd {
    sum: Vec<f64>,
    weight: Vec<f64>,
}

impl OverlapAdd {
    pub fn new(n: usize) -> Self {
        Self {
            sum: vec![0.0; n],
            weight: vec![0.0; n],
        }
    }

    /// Adds one window's fitted increments.
    pub fn accumulate(&mut self, bound: WindowBound, fitted: &[f64], weights: &[f64]) {
        assert_eq!(
            fitted.len(),
            bound.len(),
            "fitted window length does not match its bound"
        );
        assert_eq!(weights.len(), bound.len(), "weight length does not match its bound");

        let sums = &mut self.sum[bound.start..bound.end];
        let ws = &mut self.weight[bound.start..bound.end];
        for ((s, w), (&f, &wk)) in sums.iter_mut().zip(ws.iter_mut()).zip(fitted.iter().zip(weights)) {
            *s += f * wk;
            *w += wk;
        }
    }

    /// Weighted average per position.
    ///
    /// Positions with zero accumulated weight fall back to `original`.
    pub fn finish(self, original: &[f64]) -> Vec<f64> {
        assert_eq!(
            original.len(),
            self.sum.len(),
            "aggregate length does not match the increment sequence"
        );

        self.sum
            .iter()
            .zip(&self.weight)
            .zip(original)
            .map(|((&s, &w), &orig)| if w > 0.0 { s / w } else { orig })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_weights_are_ones() {
        assert_eq!(window_weights(4, OverlapWeighting::Flat), vec![1.0; 4]);
    }

    #[test]
    fn hann_weights_vanish_at_the_edges() {
        let w = window_weights(5, OverlapWeighting::Hann);
        assert_eq!(w.len(), 5);
        assert_eq!(w[0], 0.0);
        assert!(w[4].abs() < 1e-15);
        assert!((w[2] - 1.0).abs() < 1e-15);
        assert!((w[1] - w[3]).abs() < 1e-15);
    }

    #[test]
    fn short_hann_windows_are_flat() {
        assert_eq!(window_weights(2, OverlapWeighting::Hann), vec![1.0, 1.0]);
    }

    #[test]
    fn overlapping_windows_are_averaged() {
        let mut acc = OverlapAdd::new(4);
        acc.accumulate(WindowBound::new(0, 3), &[1.0, 2.0, 3.0], &[1.0; 3]);
        acc.accumulate(WindowBound::new(1, 4), &[4.0, 6.0, 8.0], &[1.0; 3]);

        let out = acc.finish(&[0.0; 4]);
        assert_eq!(out, vec![1.0, 3.0, 4.5, 8.0]);
    }

    #[test]
    fn zero_weight_falls_back_to_original() {
        let mut acc = OverlapAdd::new(3);
        acc.accumulate(WindowBound::new(0, 3), &[9.0, 9.0, 9.0], &[0.0, 1.0, 0.0]);

        let out = acc.finish(&[0.1, 0.2, 0.3]);
        assert_eq!(out, vec![0.1, 9.0, 0.3]);
    }

    #[test]
    #[should_panic(expected = "fitted window length")]
    fn mismatched_window_is_fatal() {
        let mut acc = OverlapAdd::new(3);
        acc.accumulate(WindowBound::new(0, 3), &[1.0], &[1.0; 3]);
    }
}
