use crate::capture::{AdcFrameLoader, AdcTensor};
use crate::math::window::WindowCoefficients;
use crate::prelude::{FmcwError, FmcwResult, ProcessingStage};
use crate::processing::doppler::{DopplerStage, RangeDopplerMap};
use crate::processing::normalize::Normalizer;
use crate::processing::profile::{chirp_mean_magnitude, RangeProfile};
use crate::processing::range::RangeStage;
use crate::radar::{DerivedParameters, RadarConfig};
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::MetricsRecorder;
use ndarray::{concatenate, Array2, Array3, Axis};
use std::sync::Arc;

/// Products of one processing run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub params: DerivedParameters,
    pub range_doppler: RangeDopplerMap,
    pub profile: RangeProfile,
}

/// Both branches for a contiguous block of frames, before profile assembly.
struct FrameBlock {
    range_doppler_db: Array3<f64>,
    mean_magnitude: Array2<f64>,
}

/// Full chain from ADC tensor to Range-Doppler map and range profile.
pub struct Pipeline {
    config: RadarConfig,
    params: DerivedParameters,
    window: Arc<WindowCoefficients>,
    normalizer: Normalizer,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl Pipeline {
    pub fn new(config: RadarConfig) -> Self {
        let params = DerivedParameters::derive(&config);
        let window = Arc::new(WindowCoefficients::range_window(config.adc_samples()));
        let normalizer = Normalizer::new(window.sum());
        let logger = LogManager::new("pipeline");
        logger.record(&format!(
            "bandwidth {:.3} GHz, range resolution {:.4} m, max velocity {:.3} m/s",
            params.bandwidth_hz / 1e9,
            params.range_resolution_m,
            params.max_velocity_mps
        ));

        Self {
            config,
            params,
            window,
            normalizer,
            metrics: Arc::new(MetricsRecorder::new()),
            logger,
        }
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn params(&self) -> &DerivedParameters {
        &self.params
    }

    pub fn window(&self) -> &WindowCoefficients {
        &self.window
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }

    pub fn loader(&self) -> AdcFrameLoader {
        AdcFrameLoader::new(self.config)
    }

    /// Processes every frame on the calling thread.
    pub fn run(&self, tensor: &AdcTensor) -> FmcwResult<PipelineOutput> {
        let result = self
            .check_tensor(tensor)
            .and_then(|_| process_block(&self.window, self.normalizer, tensor))
            .and_then(|block| self.assemble(vec![block]));
        self.finish(result)
    }

    /// Splits frames across up to `workers` blocking tasks and joins them.
    ///
    /// Output is identical to [`Pipeline::run`].
    pub async fn run_parallel(
        &self,
        tensor: &AdcTensor,
        workers: usize,
    ) -> FmcwResult<PipelineOutput> {
        let result = self.run_blocks(tensor, workers).await;
        self.finish(result)
    }

    async fn run_blocks(&self, tensor: &AdcTensor, workers: usize) -> FmcwResult<PipelineOutput> {
        self.check_tensor(tensor)?;
        let frames = tensor.frame_count();
        let workers = workers.clamp(1, frames);
        let frames_per_worker = frames.div_ceil(workers);

        let mut handles = Vec::with_capacity(workers);
        for start in (0..frames).step_by(frames_per_worker) {
            let end = (start + frames_per_worker).min(frames);
            let block = tensor.frames(start, end);
            let window = self.window.clone();
            let normalizer = self.normalizer;
            self.logger
                .detail(&format!("dispatching frames {}..{}", start, end));
            handles.push(tokio::task::spawn_blocking(move || {
                process_block(&window, normalizer, &block)
            }));
        }

        let mut blocks = Vec::with_capacity(handles.len());
        for handle in handles {
            let block = handle
                .await
                .map_err(|err| FmcwError::Internal(format!("frame worker failed: {}", err)))??;
            blocks.push(block);
        }
        self.assemble(blocks)
    }

    fn check_tensor(&self, tensor: &AdcTensor) -> FmcwResult<()> {
        let (samples, chirps, frames) = tensor.dim();
        if samples != self.config.adc_samples()
            || chirps != self.config.chirps_per_frame()
            || frames == 0
        {
            return Err(FmcwError::InvalidInput(format!(
                "tensor {}x{}x{} does not match configured {} samples x {} chirps",
                samples,
                chirps,
                frames,
                self.config.adc_samples(),
                self.config.chirps_per_frame()
            )));
        }
        Ok(())
    }

    fn assemble(&self, blocks: Vec<FrameBlock>) -> FmcwResult<PipelineOutput> {
        let maps: Vec<_> = blocks.iter().map(|b| b.range_doppler_db.view()).collect();
        let means: Vec<_> = blocks.iter().map(|b| b.mean_magnitude.view()).collect();
        let range_doppler_db = concatenate(Axis(2), &maps)
            .map_err(|err| FmcwError::Internal(format!("joining Range-Doppler blocks: {}", err)))?;
        let mean_magnitude = concatenate(Axis(1), &means)
            .map_err(|err| FmcwError::Internal(format!("joining profile blocks: {}", err)))?;

        Ok(PipelineOutput {
            params: self.params.clone(),
            range_doppler: RangeDopplerMap::from_db(range_doppler_db),
            profile: RangeProfile::from_mean_magnitude(mean_magnitude, &self.normalizer)?,
        })
    }

    fn finish(&self, result: FmcwResult<PipelineOutput>) -> FmcwResult<PipelineOutput> {
        match &result {
            Ok(output) => {
                let frames = output.range_doppler.frame_count();
                self.metrics.record_frames(frames);
                self.metrics.record_completed();
                self.logger.record(&format!("processed {} frames", frames));
            }
            Err(err) => {
                self.metrics.record_failed();
                self.logger.warn(&format!("run aborted: {}", err));
            }
        }
        result
    }
}

fn process_block(
    window: &Arc<WindowCoefficients>,
    normalizer: Normalizer,
    tensor: &AdcTensor,
) -> FmcwResult<FrameBlock> {
    let (_, chirps, _) = tensor.dim();
    let range_fft = RangeStage::new(window.clone()).execute(tensor)?;

    let spectrum = DopplerStage::new(chirps).execute(&range_fft)?;
    let range_doppler = RangeDopplerMap::from_spectrum(&spectrum, &normalizer);

    Ok(FrameBlock {
        range_doppler_db: range_doppler.into_db(),
        mean_magnitude: chirp_mean_magnitude(&range_fft)?,
    })
}
