//! Shrinkage operators shared by the TV solver and the wavelet path.

use corelib::stats;

/// Gaussian consistency constant for the median absolute deviation.
const MAD_TO_SIGMA: f64 = 0.6745;

/// `sign(x) * max(|x| - tau, 0)`.
#[inline]
pub fn soft_threshold(x: f64, tau: f64) -> f64 {
    let mag = (x.abs() - tau).max(0.0);
    if mag == 0.0 { 0.0 } else { x.signum() * mag }
}

pub fn soft_threshold_all(xs: &[f64], tau: f64) -> Vec<f64> {
    xs.iter().map(|&x| soft_threshold(x, tau)).collect()
}

/// BayesShrink threshold for one detail band.
///
/// - noise sigma from the median absolute coefficient
/// - signal variance = band variance - sigma^2, floored at 0
/// - a band with no signal variance is treated as pure noise and shrunk
///   entirely (threshold = largest magnitude)
/// - a constant band returns 0.0
pub fn bayes_shrink_threshold(detail: &[f64]) -> f64 {
    let var = stats::variance(detail);
    if var <= 0.0 {
        return 0.0;
    }

    let abs: Vec<f64> = detail.iter().map(|d| d.abs()).collect();
    let sigma = stats::median(&abs) / MAD_TO_SIGMA + 1e-12;
    let noise_var = sigma * sigma;
    let signal_var = (var - noise_var).max(0.0);

    if signal_var <= 0.0 {
        return stats::max_abs(detail);
    }
    noise_var / (signal_var + 1e-12).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_threshold_shrinks_towards_zero() {
        assert_eq!(soft_threshold(3.0, 1.0), 2.0);
        assert_eq!(soft_threshold(-3.0, 1.0), -2.0);
        assert_eq!(soft_threshold(0.5, 1.0), 0.0);
        assert_eq!(soft_threshold(-0.5, 1.0), 0.0);
        assert_eq!(soft_threshold(0.0, 0.0), 0.0);
    }

    #[test]
    fn zero_tau_is_identity() {
        let xs = [1.5, -2.25, 0.0, 7.0];
        assert_eq!(soft_threshold_all(&xs, 0.0), xs.to_vec());
    }

    #[test]
    fn constant_band_has_zero_threshold() {
        assert_eq!(bayes_shrink_threshold(&[2.0, 2.0, 2.0]), 0.0);
        assert_eq!(bayes_shrink_threshold(&[]), 0.0);
    }

    #[test]
    fn pure_noise_band_is_shrunk_entirely() {
        // Median |d| is large relative to the spread: no signal variance left.
        let d = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let thr = bayes_shrink_threshold(&d);
        assert_eq!(thr, 1.0);
        assert!(soft_threshold_all(&d, thr).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn sparse_band_keeps_large_coefficients() {
        let mut d = vec![0.01; 64];
        for (i, v) in d.iter_mut().enumerate() {
            if i % 2 == 1 {
                *v = -0.01;
            }
        }
        d[10] = 5.0;
        let thr = bayes_shrink_threshold(&d);
        assert!(thr > 0.0 && thr < 5.0);
        assert!(soft_threshold(d[10], thr) > 0.0);
    }
}
