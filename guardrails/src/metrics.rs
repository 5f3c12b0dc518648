use corelib::stats;

/// Below this standard deviation a series is treated as constant.
const MIN_STD: f64 = 1e-12;

/// Pearson correlation of two equal-length series.
///
/// Returns 0.0 when either series is (near) constant.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len(), "correlated series differ in length");

    let sx = stats::std_dev(x);
    let sy = stats::std_dev(y);
    if sx < MIN_STD || sy < MIN_STD {
        return 0.0;
    }

    let mx = stats::mean(x);
    let my = stats::mean(y);
    let cov = x
        .iter()
        .zip(y)
        .map(|(a, b)| (a - mx) * (b - my))
        .sum::<f64>()
        / x.len() as f64;

    (cov / (sx * sy)).clamp(-1.0, 1.0)
}

pub fn rmse(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len(), "compared series differ in length");
    if x.is_empty() {
        return 0.0;
    }
    let sq: f64 = x.iter().zip(y).map(|(a, b)| (a - b) * (a - b)).sum();
    (sq / x.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_correlated_and_anticorrelated() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v + 1.0).collect();
        let z: Vec<f64> = x.iter().map(|v| -v).collect();
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &z) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_has_zero_correlation() {
        assert_eq!(pearson(&[2.0; 10], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]), 0.0);
        assert_eq!(pearson(&[], &[]), 0.0);
    }

    #[test]
    fn rmse_of_constant_offset() {
        let x = [1.0, 2.0, 3.0];
        let y = [1.5, 2.5, 3.5];
        assert!((rmse(&x, &y) - 0.5).abs() < 1e-12);
        assert_eq!(rmse(&x, &x), 0.0);
        assert_eq!(rmse(&[], &[]), 0.0);
    }
}
