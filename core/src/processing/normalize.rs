use ndarray::{Array, ArrayBase, Data, Dimension};
use num_complex::Complex64;

/// Largest int16 magnitude, the ADC full-scale reference.
pub const FULL_SCALE: f64 = 32767.0;
/// Floor added to the full-scale ratio inside the logarithm.
pub const RATIO_FLOOR: f64 = 1e-6;
/// Floor added to the raw magnitude before scaling.
pub const MAGNITUDE_FLOOR: f64 = f64::EPSILON;

/// Converts FFT magnitudes to dBFS relative to the windowed full-scale tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    reference: f64,
}

impl Normalizer {
    /// `window_sum` is the coherent gain of the fast-time window.
    pub fn new(window_sum: f64) -> Self {
        Self {
            reference: FULL_SCALE * window_sum,
        }
    }

    pub fn reference(&self) -> f64 {
        self.reference
    }

    /// `20·log10((|x| + eps) / (32767·Σw) + 1e-6)`
    pub fn to_db(&self, magnitude: f64) -> f64 {
        20.0 * ((magnitude + MAGNITUDE_FLOOR) / self.reference + RATIO_FLOOR).log10()
    }

    /// dB value every exactly-zero bin maps to.
    pub fn floor_db(&self) -> f64 {
        self.to_db(0.0)
    }

    pub fn complex_to_db<S, D>(&self, bins: &ArrayBase<S, D>) -> Array<f64, D>
    where
        S: Data<Elem = Complex64>,
        D: Dimension,
    {
        bins.mapv(|bin| self.to_db(bin.norm()))
    }

    pub fn magnitude_to_db<S, D>(&self, magnitudes: &ArrayBase<S, D>) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        magnitudes.mapv(|magnitude| self.to_db(magnitude))
    }
}
