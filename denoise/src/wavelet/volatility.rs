use corelib::stats;

use crate::increments::to_increments;

/// Rolling realised volatility: `sqrt(sum of squared increments)` over the
/// trailing `window` samples (fewer at the start of the series).
pub fn realized_vol(x: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let sq: Vec<f64> = to_increments(x).iter().map(|d| d * d).collect();

    let mut out = Vec::with_capacity(sq.len());
    let mut running = 0.0;
    for k in 0..sq.len() {
        running += sq[k];
        if k >= window {
            running -= sq[k - window];
        }
        out.push(running.max(1e-12).sqrt());
    }
    out
}

/// Single threshold multiplier from local volatility.
///
/// Volatility is normalised by its median, clipped to `[0.5, 2.0]` and
/// summarised by the median of the clipped ratios.
pub fn volatility_scale(x: &[f64], window: usize) -> f64 {
    let vol = realized_vol(x, window);
    if vol.is_empty() {
        return 1.0;
    }
    let med = stats::median(&vol) + 1e-12;
    let scale: Vec<f64> = vol.iter().map(|v| (v / med).clamp(0.5, 2.0)).collect();
    stats::median(&scale)
}
