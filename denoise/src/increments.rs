//! Price <-> increment conversion.
//!
//! `increments[0]` is always 0.0: the first observation has no predecessor,
//! so the first price is carried separately as the baseline.

/// First differences with a leading 0.0. Output length equals input length.
pub fn to_increments(prices: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return out;
    }
    out.push(0.0);
    out.extend(prices.windows(2).map(|w| w[1] - w[0]));
    out
}

/// `baseline + cumsum(increments)`.
pub fn from_increments(baseline: f64, increments: &[f64]) -> Vec<f64> {
    let mut acc = baseline;
    increments
        .iter()
        .map(|inc| {
            acc += inc;
            acc
        })
        .collect()
}
