//! Orthogonal Daubechies filter banks.
//!
//! Only the reconstruction low-pass is stored; the high-pass is its
//! quadrature mirror `g[k] = (-1)^k h[L-1-k]`.

use corelib::DenoiseError;

const HAAR: [f64; 2] = [0.7071067811865476, 0.7071067811865476];

const DB2: [f64; 4] = [
    0.48296291314453416,
    0.8365163037378079,
    0.2241438680420134,
    -0.12940952255126037,
];

const DB3: [f64; 6] = [
    0.33267055295008263,
    0.8068915093110925,
    0.45987750211849154,
    -0.13501102001025458,
    -0.08544127388202666,
    0.03522629188570954,
];

const DB4: [f64; 8] = [
    0.2303778133088965,
    0.7148465705529157,
    0.6308807679298589,
    -0.027983769416859854,
    -0.18703481171909309,
    0.030841381835560764,
    0.0328830116668852,
    -0.010597401785069032,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wavelet {
    name: &'static str,
    lowpass: &'static [f64],
}

impl Wavelet {
    pub fn from_name(name: &str) -> Result<Self, DenoiseError> {
        let (name, lowpass): (&'static str, &'static [f64]) =
            match name.trim().to_ascii_lowercase().as_str() {
                "haar" | "db1" => ("haar", &HAAR),
                "db2" => ("db2", &DB2),
                "db3" => ("db3", &DB3),
                "db4" => ("db4", &DB4),
                _ => return Err(DenoiseError::UnknownWavelet(name.to_string())),
            };
        Ok(Self { name, lowpass })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Filter length.
    pub fn dec_len(&self) -> usize {
        self.lowpass.len()
    }

    pub fn lowpass(&self) -> &'static [f64] {
        self.lowpass
    }

    pub fn highpass(&self) -> Vec<f64> {
        let l = self.lowpass.len();
        (0..l)
            .map(|k| {
                let h = self.lowpass[l - 1 - k];
                if k % 2 == 0 { h } else { -h }
            })
            .collect()
    }
}
