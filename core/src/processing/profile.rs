use crate::prelude::{FmcwError, FmcwResult, ProcessingStage};
use crate::processing::normalize::Normalizer;
use crate::processing::range::RangeFftResult;
use crate::telemetry::log::LogManager;
use ndarray::{Array1, Array2, ArrayView1, Axis, Zip};

/// Chirp-averaged range profile.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeProfile {
    mean_magnitude: Array2<f64>,
    per_frame_db: Array2<f64>,
    averaged_db: Array1<f64>,
}

impl RangeProfile {
    /// Builds the profile from mean magnitudes shaped `[range_bin, frame]`.
    pub fn from_mean_magnitude(
        mean_magnitude: Array2<f64>,
        normalizer: &Normalizer,
    ) -> FmcwResult<Self> {
        let across_frames = mean_magnitude
            .mean_axis(Axis(1))
            .ok_or_else(|| FmcwError::InvalidInput("range profile has no frames".into()))?;
        Ok(Self {
            per_frame_db: normalizer.magnitude_to_db(&mean_magnitude),
            averaged_db: normalizer.magnitude_to_db(&across_frames),
            mean_magnitude,
        })
    }

    /// Linear mean magnitude `[range_bin, frame]`.
    pub fn mean_magnitude(&self) -> &Array2<f64> {
        &self.mean_magnitude
    }

    /// dB profile `[range_bin, frame]`.
    pub fn per_frame_db(&self) -> &Array2<f64> {
        &self.per_frame_db
    }

    pub fn frame(&self, index: usize) -> ArrayView1<'_, f64> {
        self.per_frame_db.index_axis(Axis(1), index)
    }

    /// dB profile of the magnitude averaged over every chirp of every frame.
    pub fn averaged_db(&self) -> &Array1<f64> {
        &self.averaged_db
    }
}

/// Mean range-FFT magnitude across chirps, shaped `[range_bin, frame]`.
pub fn chirp_mean_magnitude(input: &RangeFftResult) -> FmcwResult<Array2<f64>> {
    let (range_bins, chirps, frames) = input.dim();
    if chirps == 0 {
        return Err(FmcwError::InvalidInput("range spectrum has no chirps".into()));
    }

    // Incoherent: magnitude first, then the mean over chirps in chirp order.
    let mut mean_magnitude = Array2::<f64>::zeros((range_bins, frames));
    Zip::from(&mut mean_magnitude)
        .and(input.bins().lanes(Axis(1)))
        .for_each(|mean, lane| {
            *mean = lane.iter().map(|bin| bin.norm()).sum::<f64>() / chirps as f64;
        });
    Ok(mean_magnitude)
}

/// Averages range-FFT magnitude across chirps.
pub struct ProfileStage {
    normalizer: Normalizer,
    logger: LogManager,
}

impl ProfileStage {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            logger: LogManager::new("profile"),
        }
    }
}

impl ProcessingStage for ProfileStage {
    type Input = RangeFftResult;
    type Output = RangeProfile;

    fn name(&self) -> &'static str {
        self.logger.stage()
    }

    fn execute(&mut self, input: &RangeFftResult) -> FmcwResult<RangeProfile> {
        let (range_bins, _, frames) = input.dim();
        let mean_magnitude = chirp_mean_magnitude(input)?;
        self.logger
            .detail(&format!("{} range bins x {} frames averaged", range_bins, frames));
        RangeProfile::from_mean_magnitude(mean_magnitude, &self.normalizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use num_complex::Complex64;

    #[test]
    fn averages_magnitude_not_complex_value() {
        // Opposite phases cancel coherently but not incoherently.
        let bins = Array3::from_shape_fn((2, 2, 1), |(r, c, _)| {
            let sign = if c == 0 { 1.0 } else { -1.0 };
            Complex64::new(sign * (r + 1) as f64, 0.0)
        });
        let normalizer = Normalizer::new(1.0);
        let mut stage = ProfileStage::new(normalizer);
        let profile = stage.execute(&RangeFftResult::new(bins)).unwrap();
        assert_eq!(profile.mean_magnitude()[[0, 0]], 1.0);
        assert_eq!(profile.mean_magnitude()[[1, 0]], 2.0);
        assert_eq!(profile.frame(0)[1], normalizer.to_db(2.0));
    }

    #[test]
    fn averaged_profile_spans_frames() {
        let bins = Array3::from_shape_fn((3, 4, 2), |(r, c, f)| {
            Complex64::new(0.0, (r + c + 4 * f) as f64)
        });
        let normalizer = Normalizer::new(10.0);
        let mut stage = ProfileStage::new(normalizer);
        let profile = stage.execute(&RangeFftResult::new(bins)).unwrap();
        assert_eq!(profile.per_frame_db().dim(), (3, 2));
        assert_eq!(profile.averaged_db().len(), 3);
        // frame means are r + 1.5 and r + 5.5
        assert!((profile.mean_magnitude()[[0, 1]] - 5.5).abs() < 1e-12);
        assert!((profile.averaged_db()[2] - normalizer.to_db(5.5)).abs() < 1e-12);
    }

    #[test]
    fn chirp_mean_matches_stage_profile() {
        let bins = Array3::from_shape_fn((4, 3, 2), |(r, c, f)| {
            Complex64::new((r * c) as f64 - 1.5, (f + c) as f64)
        });
        let input = RangeFftResult::new(bins);
        let mean = chirp_mean_magnitude(&input).unwrap();
        assert_eq!(mean.dim(), (4, 2));
        let profile = ProfileStage::new(Normalizer::new(2.0)).execute(&input).unwrap();
        assert_eq!(&mean, profile.mean_magnitude());
    }

    #[test]
    fn spectrum_without_chirps_is_rejected() {
        let input = RangeFftResult::new(Array3::zeros((4, 0, 1)));
        assert!(matches!(
            chirp_mean_magnitude(&input),
            Err(FmcwError::InvalidInput(_))
        ));
    }
}
