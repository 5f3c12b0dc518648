use corelib::{DenoiseError, WindowBound};

/// Partition `[0, n)` into overlapping windows of length `window`.
///
/// Guarantees:
/// - the first bound starts at 0 and the last ends at `n`
/// - every index in `[0, n)` is covered at least once
/// - bounds are sorted by start and deduplicated
///
/// `n == 0` yields the single degenerate bound `(0, 0)`; `window == 0` or
/// `window >= n` yields the whole range as one bound.
pub fn sliding_windows(
    n: usize,
    window: usize,
    overlap: f64,
) -> Result<Vec<WindowBound>, DenoiseError> {
    if !(0.0..1.0).contains(&overlap) {
        return Err(DenoiseError::InvalidOverlap(overlap));
    }
    if n == 0 {
        return Ok(vec![WindowBound::new(0, 0)]);
    }
    if window == 0 || window >= n {
        return Ok(vec![WindowBound::new(0, n)]);
    }

    let step = window_step(window, overlap);
    let mut bounds = Vec::with_capacity(n / step + 2);

    let mut i = 0;
    while i < n {
        let j = (i + window).min(n);
        bounds.push(WindowBound::new(i, j));
        if j == n {
            break;
        }
        i += step;
        if i >= n {
            // Tail not reached by the last full step: anchor one window at the end.
            if bounds.last().map(|b| b.end) != Some(n) {
                bounds.push(WindowBound::new(n.saturating_sub(window), n));
            }
            break;
        }
    }

    bounds.sort_unstable();
    bounds.dedup();
    Ok(bounds)
}

/// `max(1, round(window * (1 - overlap)))`, ties rounded to even.
fn window_step(window: usize, overlap: f64) -> usize {
    let raw = (window as f64 * (1.0 - overlap)).round_ties_even();
    (raw as usize).max(1)
}
