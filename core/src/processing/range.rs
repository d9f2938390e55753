use crate::capture::AdcTensor;
use crate::math::fft::FftHelper;
use crate::math::stats::StatsHelper;
use crate::math::window::WindowCoefficients;
use crate::prelude::{FmcwError, FmcwResult, ProcessingStage};
use crate::telemetry::log::LogManager;
use ndarray::{Array3, ArrayView1, Axis, Zip};
use num_complex::Complex64;
use rustfft::num_traits::Zero;
use std::sync::Arc;

/// Positive-frequency range spectrum indexed `[range_bin, chirp, frame]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFftResult {
    bins: Array3<Complex64>,
}

impl RangeFftResult {
    pub fn new(bins: Array3<Complex64>) -> Self {
        Self { bins }
    }

    pub fn bins(&self) -> &Array3<Complex64> {
        &self.bins
    }

    /// `(range_bins, chirps, frames)`
    pub fn dim(&self) -> (usize, usize, usize) {
        self.bins.dim()
    }

    pub fn magnitudes(&self) -> Array3<f64> {
        self.bins.mapv(|bin| bin.norm())
    }
}

/// Windows every chirp and transforms it along fast-time.
pub struct RangeStage {
    window: Arc<WindowCoefficients>,
    fft: FftHelper,
    logger: LogManager,
}

impl RangeStage {
    pub fn new(window: Arc<WindowCoefficients>) -> Self {
        let fft = FftHelper::new(window.len());
        Self {
            window,
            fft,
            logger: LogManager::new("range"),
        }
    }
}

impl ProcessingStage for RangeStage {
    type Input = AdcTensor;
    type Output = RangeFftResult;

    fn name(&self) -> &'static str {
        self.logger.stage()
    }

    fn execute(&mut self, input: &AdcTensor) -> FmcwResult<RangeFftResult> {
        let (samples, chirps, frames) = input.dim();
        if samples != self.window.len() {
            return Err(FmcwError::InvalidInput(format!(
                "window has {} coefficients but chirps carry {} samples",
                self.window.len(),
                samples
            )));
        }

        let half = samples / 2;
        let mut bins = Array3::<Complex64>::zeros((half, chirps, frames));
        let mut buffer = vec![Complex64::zero(); samples];
        let coefficients = self.window.coefficients();
        let fft = &mut self.fft;

        Zip::from(input.samples().lanes(Axis(0)))
            .and(bins.lanes_mut(Axis(0)))
            .for_each(|chirp, mut spectrum| {
                for ((slot, &sample), &weight) in
                    buffer.iter_mut().zip(chirp.iter()).zip(coefficients.iter())
                {
                    *slot = Complex64::new(f64::from(sample) * weight, 0.0);
                }
                fft.forward_in_place(&mut buffer);
                // Negative-frequency mirror of a real beat signal carries no new information.
                spectrum.assign(&ArrayView1::from(&buffer[..half]));
            });

        let dc: Vec<f64> = bins
            .index_axis(Axis(0), 0)
            .iter()
            .map(|bin| bin.norm())
            .collect();
        self.logger.detail(&format!(
            "{} chirps x {} frames -> {} range bins, DC RMS {:.3}",
            chirps,
            frames,
            half,
            StatsHelper::rms(&dc)
        ));

        Ok(RangeFftResult { bins })
    }
}
