//! Ljung-Box portmanteau test for residual whiteness.

use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Lag count used by the guardrail evaluator.
pub const LJUNG_BOX_LAGS: usize = 20;

/// Ljung-Box Q statistic over lags `1..=lags`.
///
/// `None` when the statistic is undefined: a constant series or one with no
/// more samples than lags.
pub fn ljung_box_statistic(resid: &[f64], lags: usize) -> Option<f64> {
    let n = resid.len();
    if lags == 0 || n <= lags {
        return None;
    }

    let mean = resid.iter().sum::<f64>() / n as f64;
    let d: Vec<f64> = resid.iter().map(|v| v - mean).collect();
    let c0: f64 = d.iter().map(|v| v * v).sum();
    if c0 <= 0.0 {
        return None;
    }

    let q: f64 = (1..=lags)
        .map(|k| {
            let ck: f64 = d.iter().zip(&d[k..]).map(|(a, b)| a * b).sum();
            let rho = ck / c0;
            rho * rho / (n - k) as f64
        })
        .sum();

    let nf = n as f64;
    Some(nf * (nf + 2.0) * q)
}

/// Ljung-Box p-value of `resid` at `lags` lags.
///
/// An all-zero residual is perfectly white (1.0). Any other residual where
/// the test cannot be computed is reported as not white (0.0).
pub fn ljung_box_pvalue(resid: &[f64], lags: usize) -> f64 {
    if !resid.is_empty() && resid.iter().all(|&v| v == 0.0) {
        return 1.0;
    }

    let Some(q) = ljung_box_statistic(resid, lags) else {
        return 0.0;
    };
    if !q.is_finite() {
        return 0.0;
    }

    match ChiSquared::new(lags as f64) {
        Ok(chi) => (1.0 - chi.cdf(q)).clamp(0.0, 1.0),
        Err(_) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [f64; 8] = [1.0, -2.0, 0.5, 3.0, -1.0, 0.0, 2.0, -1.5];

    #[test]
    fn statistic_matches_hand_computation() {
        let q = ljung_box_statistic(&SAMPLE, 2).unwrap();
        assert!((q - 4.052039466580283).abs() < 1e-12);
    }

    #[test]
    fn pvalue_for_two_lags_is_exponential_tail() {
        // Chi-square with 2 dof has survival exp(-q / 2).
        let p = ljung_box_pvalue(&SAMPLE, 2);
        assert!((p - 0.13185931327581044).abs() < 1e-9);
    }

    #[test]
    fn degenerate_residuals() {
        assert_eq!(ljung_box_pvalue(&[0.0; 50], LJUNG_BOX_LAGS), 1.0);
        assert_eq!(ljung_box_pvalue(&[0.7; 50], LJUNG_BOX_LAGS), 0.0);
        assert_eq!(ljung_box_pvalue(&[1.0, -1.0, 2.0], LJUNG_BOX_LAGS), 0.0);
        assert_eq!(ljung_box_pvalue(&[], LJUNG_BOX_LAGS), 0.0);
    }

    #[test]
    fn persistent_residual_is_not_white() {
        let mut x = vec![0.0; 500];
        for k in 1..x.len() {
            x[k] = 0.95 * x[k - 1] + ((k * 7919 % 113) as f64 / 113.0 - 0.5);
        }
        assert!(ljung_box_pvalue(&x, LJUNG_BOX_LAGS) < 1e-6);
    }
}
