//! Local trend direction via rolling least-squares slopes.

/// Default look-back of the rolling slope.
pub const TREND_WINDOW: usize = 30;

/// Least-squares slope of `x` against its index over the trailing `window`
/// samples ending at each position.
///
/// The first `window - 1` positions use the samples available so far. A
/// single-sample window has slope 0.0.
///
/// Sums of `y` and `t * y` run over local indices `0..m` and are updated in
/// O(1) per position. They are re-accumulated once per `window` slides so
/// rounding cannot drift along long series.
pub fn rolling_slope(x: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(x.len());
    let (mut sum_y, mut sum_ty) = (0.0, 0.0);

    for (k, &y) in x.iter().enumerate() {
        if k < window {
            sum_y += y;
            sum_ty += k as f64 * y;
        } else if (k - window) % window == window - 1 {
            (sum_y, sum_ty) = local_sums(&x[k + 1 - window..=k]);
        } else {
            // Drop the oldest sample and shift every local index down by one.
            let oldest = x[k - window];
            sum_y -= oldest;
            sum_ty -= sum_y;
            sum_y += y;
            sum_ty += (window - 1) as f64 * y;
        }
        let m = (k + 1).min(window);
        out.push(slope(m, sum_y, sum_ty));
    }
    out
}

fn local_sums(seg: &[f64]) -> (f64, f64) {
    seg.iter()
        .enumerate()
        .fold((0.0, 0.0), |(sy, sty), (t, &y)| (sy + y, sty + t as f64 * y))
}

/// Closed-form OLS slope of `m` samples against local indices `0..m`.
fn slope(m: usize, sum_y: f64, sum_ty: f64) -> f64 {
    let m = m as f64;
    let sum_t = m * (m - 1.0) / 2.0;
    let sum_tt = (m - 1.0) * m * (2.0 * m - 1.0) / 6.0;

    let mut denom = m * sum_tt - sum_t * sum_t;
    if denom.abs() < 1e-12 {
        denom = 1e-12;
    }
    (m * sum_ty - sum_t * sum_y) / denom
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Fraction of positions where `a` and `b` have the same sign.
///
/// Two zeros agree. Empty input agrees trivially (1.0).
pub fn sign_agreement(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "slope series differ in length");
    if a.is_empty() {
        return 1.0;
    }
    let agree = a.iter().zip(b).filter(|(u, v)| sign(**u) == sign(**v)).count();
    agree as f64 / a.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_of_a_line_is_exact() {
        let x: Vec<f64> = (0..100).map(|i| 4.0 - 0.25 * i as f64).collect();
        let s = rolling_slope(&x, TREND_WINDOW);
        assert_eq!(s[0], 0.0);
        for v in &s[1..] {
            assert!((v + 0.25).abs() < 1e-9, "{v}");
        }
    }

    #[test]
    fn partial_windows_use_available_samples() {
        let s = rolling_slope(&[1.0, 3.0, 4.0], 30);
        assert_eq!(s[0], 0.0);
        assert!((s[1] - 2.0).abs() < 1e-12);
        assert!((s[2] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn running_sums_match_a_direct_fit() {
        let x: Vec<f64> = (0..5_000)
            .map(|i| 100.0 + (i as f64 / 37.0).sin() * 3.0 + ((i * 7919) % 13) as f64 * 0.01)
            .collect();
        for window in [1, 2, 7, TREND_WINDOW] {
            let fast = rolling_slope(&x, window);
            for (k, v) in fast.iter().enumerate() {
                let start = (k + 1).saturating_sub(window);
                let seg = &x[start..=k];
                let (sy, sty) = local_sums(seg);
                let direct = slope(seg.len(), sy, sty);
                assert!((v - direct).abs() < 1e-9, "window {window} at {k}: {v} vs {direct}");
            }
        }
    }

    #[test]
    fn window_longer_than_series() {
        let s = rolling_slope(&[5.0, 5.0], 500);
        assert_eq!(s, vec![0.0, 0.0]);
    }

    #[test]
    fn zeros_agree_and_opposites_do_not() {
        assert_eq!(sign_agreement(&[0.0, 1.0, -1.0, 2.0], &[0.0, 3.0, 1.0, 0.0]), 0.5);
        assert_eq!(sign_agreement(&[0.0; 4], &[0.0; 4]), 1.0);
        assert_eq!(sign_agreement(&[], &[]), 1.0);
    }
}
