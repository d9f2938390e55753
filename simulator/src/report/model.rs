use fmcwcore::processing::MapPeak;
use fmcwcore::radar::DerivedParameters;
use fmcwcore::telemetry::MetricsSnapshot;
use fmcwcore::PipelineOutput;
use serde::Serialize;

/// One frame of the Range-Doppler map and its range profile.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub index: usize,
    /// Rows follow `range_axis`, columns follow `velocity_axis`.
    pub range_doppler_db: Vec<Vec<f64>>,
    pub range_profile_db: Vec<f64>,
    pub peak: Option<PeakReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeakReport {
    pub range_m: f64,
    pub velocity_mps: f64,
    pub value_db: f64,
}

/// Everything the plotting front end needs from one run.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingReport {
    pub params: DerivedParameters,
    pub floor_db: f64,
    pub averaged_range_profile_db: Vec<f64>,
    pub frames: Vec<FrameReport>,
    pub frames_processed: usize,
}

impl ProcessingReport {
    pub fn from_output(output: &PipelineOutput, floor_db: f64, metrics: MetricsSnapshot) -> Self {
        let params = &output.params;
        let frames = (0..output.range_doppler.frame_count())
            .map(|index| FrameReport {
                index,
                range_doppler_db: output
                    .range_doppler
                    .frame(index)
                    .outer_iter()
                    .map(|row| row.to_vec())
                    .collect(),
                range_profile_db: output.profile.frame(index).to_vec(),
                peak: output
                    .range_doppler
                    .peak(index)
                    .map(|peak| PeakReport::locate(&peak, params)),
            })
            .collect();

        Self {
            params: params.clone(),
            floor_db,
            averaged_range_profile_db: output.profile.averaged_db().to_vec(),
            frames,
            frames_processed: metrics.frames_processed,
        }
    }
}

impl PeakReport {
    fn locate(peak: &MapPeak, params: &DerivedParameters) -> Self {
        Self {
            range_m: params.range_axis[peak.range_bin],
            velocity_mps: params.velocity_axis[peak.doppler_bin],
            value_db: peak.value_db,
        }
    }
}
