use crate::math::fft::{fft_shift, FftHelper};
use crate::math::stats::StatsHelper;
use crate::prelude::{FmcwError, FmcwResult, ProcessingStage};
use crate::processing::normalize::Normalizer;
use crate::processing::range::RangeFftResult;
use crate::telemetry::log::LogManager;
use ndarray::{Array3, ArrayView1, ArrayView2, Axis};
use num_complex::Complex64;
use rustfft::num_traits::Zero;
use serde::Serialize;

/// Complex range-Doppler spectrum `[range_bin, doppler_bin, frame]`, zero Doppler at `chirps / 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct DopplerSpectrum {
    bins: Array3<Complex64>,
}

impl DopplerSpectrum {
    pub fn bins(&self) -> &Array3<Complex64> {
        &self.bins
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        self.bins.dim()
    }
}

/// Strongest cell of one frame's map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapPeak {
    pub range_bin: usize,
    pub doppler_bin: usize,
    pub value_db: f64,
}

/// Range-Doppler map in dBFS, `[range_bin, doppler_bin, frame]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeDopplerMap {
    db: Array3<f64>,
}

impl RangeDopplerMap {
    pub fn from_spectrum(spectrum: &DopplerSpectrum, normalizer: &Normalizer) -> Self {
        Self {
            db: normalizer.complex_to_db(spectrum.bins()),
        }
    }

    pub(crate) fn from_db(db: Array3<f64>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Array3<f64> {
        &self.db
    }

    pub fn into_db(self) -> Array3<f64> {
        self.db
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        self.db.dim()
    }

    pub fn frame_count(&self) -> usize {
        self.db.len_of(Axis(2))
    }

    /// `[range_bin, doppler_bin]` view of one frame.
    pub fn frame(&self, index: usize) -> ArrayView2<'_, f64> {
        self.db.index_axis(Axis(2), index)
    }

    pub fn peak(&self, frame: usize) -> Option<MapPeak> {
        if frame >= self.frame_count() {
            return None;
        }
        StatsHelper::argmax_2d(self.frame(frame)).map(|((range_bin, doppler_bin), value_db)| {
            MapPeak {
                range_bin,
                doppler_bin,
                value_db,
            }
        })
    }
}

/// Transforms along slow-time and centres zero Doppler.
pub struct DopplerStage {
    fft: FftHelper,
    logger: LogManager,
}

impl DopplerStage {
    pub fn new(chirps_per_frame: usize) -> Self {
        Self {
            fft: FftHelper::new(chirps_per_frame),
            logger: LogManager::new("doppler"),
        }
    }
}

impl ProcessingStage for DopplerStage {
    type Input = RangeFftResult;
    type Output = DopplerSpectrum;

    fn name(&self) -> &'static str {
        self.logger.stage()
    }

    fn execute(&mut self, input: &RangeFftResult) -> FmcwResult<DopplerSpectrum> {
        let (range_bins, chirps, frames) = input.dim();
        if chirps != self.fft.len() {
            return Err(FmcwError::InvalidInput(format!(
                "Doppler FFT planned for {} chirps, spectrum carries {}",
                self.fft.len(),
                chirps
            )));
        }

        let mut bins = input.bins().clone();
        let mut buffer = vec![Complex64::zero(); chirps];
        for mut lane in bins.lanes_mut(Axis(1)) {
            for (slot, value) in buffer.iter_mut().zip(lane.iter()) {
                *slot = *value;
            }
            self.fft.forward_in_place(&mut buffer);
            fft_shift(&mut buffer);
            lane.assign(&ArrayView1::from(&buffer[..]));
        }

        self.logger.detail(&format!(
            "{} range bins x {} frames -> {} Doppler bins",
            range_bins, frames, chirps
        ));
        Ok(DopplerSpectrum { bins })
    }
}
