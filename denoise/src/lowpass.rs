//! Zero-phase FIR low-pass used as an optional post-filter on the wavelet path.

use std::f64::consts::PI;

/// Low-pass settings in absolute frequency units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowpassParams {
    pub cutoff_hz: f64,
    pub sampling_rate_hz: f64,
    pub taps: usize,
}

/// Windowed-sinc low-pass design with a symmetric Hann window.
///
/// `cutoff` is relative to Nyquist (`1.0` = Nyquist). Taps are scaled to
/// unit gain at DC.
pub fn firwin(numtaps: usize, cutoff: f64) -> Vec<f64> {
    let numtaps = numtaps.max(1);
    let centre = (numtaps - 1) as f64 / 2.0;

    let mut taps: Vec<f64> = (0..numtaps)
        .map(|k| {
            let m = k as f64 - centre;
            cutoff * sinc(cutoff * m) * hann(k, numtaps)
        })
        .collect();

    let dc: f64 = taps.iter().sum();
    if dc.abs() > f64::EPSILON {
        for t in taps.iter_mut() {
            *t /= dc;
        }
    }
    taps
}

/// Forward-backward FIR filtering with odd extension at both ends.
///
/// Each pass starts from the steady-state filter response to its first
/// sample, so constant and linear segments pass through unchanged.
pub fn filtfilt(taps: &[f64], x: &[f64], padlen: usize) -> Vec<f64> {
    let n = x.len();
    if n < 2 || taps.is_empty() {
        return x.to_vec();
    }
    let padlen = padlen.min(n - 1);

    let mut ext = Vec::with_capacity(n + 2 * padlen);
    ext.extend((1..=padlen).rev().map(|i| 2.0 * x[0] - x[i]));
    ext.extend_from_slice(x);
    ext.extend((1..=padlen).map(|i| 2.0 * x[n - 1] - x[n - 1 - i]));

    let zi = steady_state(taps);

    let mut y = lfilter(taps, &ext, &zi);
    y.reverse();
    let mut y = lfilter(taps, &y, &zi);
    y.reverse();

    y[padlen..padlen + n].to_vec()
}

/// Zero-phase low-pass of `x`.
///
/// The cutoff is clamped just inside `(0, Nyquist)`; the edge padding is
/// `min(3 * taps, max(5, n / 2))`, capped at `n - 1`.
pub fn zero_phase_lowpass(x: &[f64], params: &LowpassParams) -> Vec<f64> {
    let nyquist = params.sampling_rate_hz / 2.0;
    let cutoff = (params.cutoff_hz / nyquist).clamp(1e-6, 0.999999);
    let taps = firwin(params.taps, cutoff);
    let padlen = (3 * taps.len().max(1)).min((x.len() / 2).max(5));
    filtfilt(&taps, x, padlen)
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

fn hann(k: usize, len: usize) -> f64 {
    if len == 1 {
        return 1.0;
    }
    0.5 - 0.5 * (2.0 * PI * k as f64 / (len - 1) as f64).cos()
}

/// Initial state giving the steady-state response to a unit step.
fn steady_state(taps: &[f64]) -> Vec<f64> {
    (1..taps.len()).map(|i| taps[i..].iter().sum()).collect()
}

/// Transposed direct-form FIR with state scaled by the first input sample.
fn lfilter(taps: &[f64], x: &[f64], zi: &[f64]) -> Vec<f64> {
    let Some(&x0) = x.first() else {
        return Vec::new();
    };
    let mut z: Vec<f64> = zi.iter().map(|v| v * x0).collect();
    let mut y = Vec::with_capacity(x.len());

    for &xn in x {
        let out = taps[0] * xn + z.first().copied().unwrap_or(0.0);
        for i in 0..z.len() {
            let next = z.get(i + 1).copied().unwrap_or(0.0);
            z[i] = taps[i + 1] * xn + next;
        }
        y.push(out);
    }
    y
}
