use crate::prelude::{FmcwError, FmcwResult};
use crate::radar::RadarConfig;
use crate::telemetry::log::LogManager;
use ndarray::{Array3, ArrayView2, Axis, ShapeBuilder};

/// Real ADC samples indexed `[fast_time_sample, chirp, frame]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AdcTensor {
    samples: Array3<i16>,
}

impl AdcTensor {
    pub fn samples(&self) -> &Array3<i16> {
        &self.samples
    }

    /// `(adc_samples, chirps_per_frame, frames)`
    pub fn dim(&self) -> (usize, usize, usize) {
        self.samples.dim()
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len_of(Axis(2))
    }

    /// `[fast_time_sample, chirp]` view of one frame.
    pub fn frame(&self, index: usize) -> ArrayView2<'_, i16> {
        self.samples.index_axis(Axis(2), index)
    }

    /// Tensor holding only frames `start..end`.
    pub fn frames(&self, start: usize, end: usize) -> AdcTensor {
        AdcTensor {
            samples: self
                .samples
                .slice_axis(Axis(2), (start..end).into())
                .to_owned(),
        }
    }
}

/// Deframes a real-only capture into an [`AdcTensor`].
///
/// The stream is laid out `[I0, Q0, I1, Q1, ...]`; only the in-phase slots
/// carry data in this acquisition mode.
pub struct AdcFrameLoader {
    config: RadarConfig,
    logger: LogManager,
}

impl AdcFrameLoader {
    pub fn new(config: RadarConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("adc"),
        }
    }

    /// Decodes little-endian int16 values from `bytes` and deframes them.
    pub fn load_bytes(&self, bytes: &[u8]) -> FmcwResult<AdcTensor> {
        if bytes.len() % 2 != 0 {
            return Err(FmcwError::InvalidInput(format!(
                "stream of {} bytes is not a whole number of int16 values",
                bytes.len()
            )));
        }
        let values: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        self.load(&values)
    }

    pub fn load(&self, values: &[i16]) -> FmcwResult<AdcTensor> {
        let expected = self.config.expected_stream_len();
        if values.len() != expected {
            return Err(FmcwError::SizeMismatch {
                expected,
                observed: values.len(),
            });
        }

        let in_phase: Vec<i16> = values.iter().step_by(2).copied().collect();
        let quadrature_used = values.iter().skip(1).step_by(2).filter(|&&q| q != 0).count();
        if quadrature_used > 0 {
            self.logger.warn(&format!(
                "{} quadrature slots are non-zero; real-only deframing discards them",
                quadrature_used
            ));
        }

        let shape = (
            self.config.adc_samples(),
            self.config.chirps_per_frame(),
            self.config.frames(),
        );
        // Fast-time sample varies fastest, then chirp, then frame.
        let samples = Array3::from_shape_vec(shape.f(), in_phase)
            .map_err(|err| FmcwError::Internal(format!("reshaping ADC samples: {}", err)))?;

        self.logger.record(&format!(
            "loaded {} samples x {} chirps x {} frames",
            shape.0, shape.1, shape.2
        ));
        Ok(AdcTensor { samples })
    }
}
