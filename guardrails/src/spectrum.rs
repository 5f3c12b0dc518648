use corelib::stats;
use rustfft::{FftPlanner, num_complex::Complex};

/// Shortest prefix the periodogram is computed on.
const MIN_FFT_LEN: usize = 8;

/// Low/high band power of the one-sided periodogram of `x`.
///
/// Uses the longest power-of-two prefix of `x`, demeaned by the mean of the
/// whole series. Bins at or below `split_hz` count as low. Series shorter
/// than 8 samples have no power in either band.
pub fn psd_band_power(x: &[f64], sampling_rate_hz: f64, split_hz: f64) -> (f64, f64) {
    if x.len() < MIN_FFT_LEN {
        return (0.0, 0.0);
    }
    let n = 1usize << x.len().ilog2();
    let mean = stats::mean(x);

    let mut buf: Vec<Complex<f64>> = x[..n].iter().map(|v| Complex::new(v - mean, 0.0)).collect();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(n).process(&mut buf);

    let bin_hz = sampling_rate_hz / n as f64;
    let (mut low, mut high) = (0.0, 0.0);
    for (k, c) in buf.iter().take(n / 2 + 1).enumerate() {
        let power = c.norm_sqr() / n as f64;
        if k as f64 * bin_hz <= split_hz {
            low += power;
        } else {
            high += power;
        }
    }
    (low, high)
}

/// Share of the original's low-band power kept by the denoised series,
/// capped at 1.0. Zero when the original has no low-band power.
pub fn lowfreq_preserve(
    original: &[f64],
    denoised: &[f64],
    sampling_rate_hz: f64,
    split_hz: f64,
) -> f64 {
    let (low_x, _) = psd_band_power(original, sampling_rate_hz, split_hz);
    if low_x <= 0.0 {
        return 0.0;
    }
    let (low_y, _) = psd_band_power(denoised, sampling_rate_hz, split_hz);
    (low_y / low_x).min(1.0)
}
