use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::sync::Arc;

/// Helper that wraps a planned forward `rustfft` transform for reuse across lanes.
#[derive(Clone)]
pub struct FftHelper {
    fft: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex64>,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let scratch = vec![Complex64::zero(); fft.get_inplace_scratch_len()];
        Self { fft, scratch }
    }

    pub fn len(&self) -> usize {
        self.fft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fft.len() == 0
    }

    /// Unnormalized forward transform of `buffer` in place.
    pub fn forward_in_place(&mut self, buffer: &mut [Complex64]) {
        self.fft.process_with_scratch(buffer, &mut self.scratch);
    }
}

/// Swaps the two halves of `spectrum` so the zero-frequency bin lands at `len / 2`.
pub fn fft_shift<T>(spectrum: &mut [T]) {
    let mid = spectrum.len() / 2;
    spectrum.rotate_right(mid);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real_buffer(values: &[f64]) -> Vec<Complex64> {
        values.iter().map(|&v| Complex64::new(v, 0.0)).collect()
    }

    #[test]
    fn fft_helper_returns_same_length() {
        let mut helper = FftHelper::new(4);
        let mut output = real_buffer(&[1.0, 0.0, -1.0, 0.0]);
        helper.forward_in_place(&mut output);
        assert_eq!(output.len(), 4);
        assert!(output[0].norm() < 1e-12);
        assert!((output[1].re - 2.0).abs() < 1e-12);
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let mut helper = FftHelper::new(8);
        let mut output = real_buffer(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        helper.forward_in_place(&mut output);
        assert!(output.iter().all(|c| (c.re - 1.0).abs() < 1e-12 && c.im.abs() < 1e-12));
    }

    #[test]
    fn shift_centres_zero_bin() {
        let mut bins = [0, 1, 2, 3, -4, -3, -2, -1];
        fft_shift(&mut bins);
        assert_eq!(bins, [-4, -3, -2, -1, 0, 1, 2, 3]);

        let mut odd = [0, 1, 2, -2, -1];
        fft_shift(&mut odd);
        assert_eq!(odd, [-2, -1, 0, 1, 2]);
    }
}
