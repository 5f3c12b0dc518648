//! Periodised multilevel discrete wavelet transform.
//!
//! Each level circularly convolves with the analysis filters and keeps every
//! second sample. Odd-length inputs are extended by repeating the last
//! sample; the original length is recorded and restored on the way back, so
//! `waverec(wavedec(x)) == x` up to rounding.

use corelib::DenoiseError;

use super::filters::Wavelet;

/// Coefficients of a `level`-deep decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Coarsest approximation band.
    pub approx: Vec<f64>,
    /// Detail bands, coarsest first.
    pub details: Vec<Vec<f64>>,
    /// Signal length entering each level, coarsest first.
    lengths: Vec<usize>,
}

impl Decomposition {
    pub fn level(&self) -> usize {
        self.details.len()
    }
}

/// Deepest useful decomposition for a signal and filter length.
///
/// `floor(log2(data_len / (filter_len - 1)))`, or 0 when the signal is
/// shorter than `filter_len - 1`.
pub fn max_level(data_len: usize, filter_len: usize) -> usize {
    if filter_len < 2 || data_len < filter_len - 1 {
        return 0;
    }
    (data_len as f64 / (filter_len - 1) as f64).log2().floor() as usize
}

/// Decompose `x` into `level` detail bands plus one approximation.
pub fn wavedec(x: &[f64], wavelet: &Wavelet, level: usize) -> Result<Decomposition, DenoiseError> {
    if x.len() < 2 {
        return Err(DenoiseError::SeriesTooShort {
            len: x.len(),
            min: 2,
        });
    }

    let h = wavelet.lowpass();
    let g = wavelet.highpass();

    let mut approx = x.to_vec();
    let mut details = Vec::with_capacity(level);
    let mut lengths = Vec::with_capacity(level);

    for _ in 0..level.max(1) {
        if approx.len() < 2 {
            return Err(DenoiseError::SeriesTooShort {
                len: x.len(),
                min: 1usize.checked_shl(level as u32).unwrap_or(usize::MAX),
            });
        }
        lengths.push(approx.len());
        let (a, d) = analysis_step(&approx, h, &g);
        approx = a;
        details.push(d);
    }

    details.reverse();
    lengths.reverse();
    Ok(Decomposition {
        approx,
        details,
        lengths,
    })
}

/// Inverse of [`wavedec`].
pub fn waverec(decomp: &Decomposition, wavelet: &Wavelet) -> Vec<f64> {
    let h = wavelet.lowpass();
    let g = wavelet.highpass();

    let mut approx = decomp.approx.clone();
    for (detail, &len) in decomp.details.iter().zip(&decomp.lengths) {
        let mut x = synthesis_step(&approx, detail, h, &g);
        x.truncate(len);
        approx = x;
    }
    approx
}

fn analysis_step(x: &[f64], h: &[f64], g: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut ext = x.to_vec();
    if ext.len() % 2 == 1 {
        ext.push(x[x.len() - 1]);
    }
    let n = ext.len();
    let half = n / 2;

    let mut a = vec![0.0; half];
    let mut d = vec![0.0; half];
    for i in 0..half {
        for (k, (&hk, &gk)) in h.iter().zip(g).enumerate() {
            let v = ext[(2 * i + k) % n];
            a[i] += hk * v;
            d[i] += gk * v;
        }
    }
    (a, d)
}

/// Adjoint of `analysis_step`; exact inverse because the filter bank is orthonormal.
fn synthesis_step(a: &[f64], d: &[f64], h: &[f64], g: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), d.len(), "band lengths diverged");
    let n = 2 * a.len();
    let mut x = vec![0.0; n];
    for i in 0..a.len() {
        for (k, (&hk, &gk)) in h.iter().zip(g).enumerate() {
            x[(2 * i + k) % n] += hk * a[i] + gk * d[i];
        }
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (i as f64 * 0.21).sin() * 3.0 + (i as f64 * 1.7).cos() + i as f64 * 0.01)
            .collect()
    }

    #[test]
    fn max_level_matches_filter_support() {
        assert_eq!(max_level(1024, 2), 10);
        assert_eq!(max_level(1000, 8), 7);
        assert_eq!(max_level(5, 8), 0);
        assert_eq!(max_level(7, 8), 0);
        assert_eq!(max_level(100, 1), 0);
    }

    #[test]
    fn perfect_reconstruction_for_all_families() {
        for name in ["haar", "db2", "db3", "db4"] {
            let w = Wavelet::from_name(name).unwrap();
            for n in [2, 3, 17, 64, 101, 500] {
                let x = signal(n);
                let level = max_level(n, w.dec_len()).max(1);
                let dec = wavedec(&x, &w, level).unwrap();
                assert_eq!(dec.level(), level);
                let y = waverec(&dec, &w);
                assert_eq!(y.len(), n, "{name} n={n}");
                for (a, b) in x.iter().zip(&y) {
                    assert!((a - b).abs() < 1e-9, "{name} n={n}: {a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn haar_splits_mean_and_difference() {
        let w = Wavelet::from_name("haar").unwrap();
        let dec = wavedec(&[1.0, 3.0], &w, 1).unwrap();
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!((dec.approx[0] - 4.0 * s).abs() < 1e-12);
        assert!((dec.details[0][0] + 2.0 * s).abs() < 1e-12);
    }

    #[test]
    fn too_short_input_is_an_error() {
        let w = Wavelet::from_name("db4").unwrap();
        assert!(matches!(
            wavedec(&[1.0], &w, 1),
            Err(DenoiseError::SeriesTooShort { len: 1, .. })
        ));
        assert!(wavedec(&[], &w, 1).is_err());
    }

    #[test]
    fn band_lengths_halve() {
        let w = Wavelet::from_name("db2").unwrap();
        let dec = wavedec(&signal(100), &w, 3).unwrap();
        let lens: Vec<usize> = dec.details.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![13, 25, 50]);
        assert_eq!(dec.approx.len(), 13);
    }
}
