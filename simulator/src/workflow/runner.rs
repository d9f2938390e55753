use crate::generator::capture::build_capture;
use crate::report::model::ProcessingReport;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use fmcwcore::{AdcTensor, Pipeline};
use log::info;
use std::fs;
use std::path::Path;
use tokio::runtime::Builder as TokioBuilder;

/// Reads a whole capture file in one scoped acquisition.
pub fn read_capture<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<u8>> {
    let path_ref = path.as_ref();
    fs::read(path_ref).with_context(|| format!("reading ADC capture {}", path_ref.display()))
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    fn load_tensor(&self, pipeline: &Pipeline) -> anyhow::Result<AdcTensor> {
        let loader = pipeline.loader();
        if let Some(generator) = &self.config.synthetic {
            info!(
                "synthesizing target at {:.2} m, {:.2} m/s",
                generator.range_m, generator.velocity_mps
            );
            let stream = build_capture(pipeline.config(), generator)?;
            return loader.load(&stream).context("deframing synthetic capture");
        }

        let path = self
            .config
            .input
            .as_ref()
            .context("workflow names neither an input capture nor a synthetic target")?;
        let bytes = read_capture(path)?;
        loader
            .load_bytes(&bytes)
            .with_context(|| format!("deframing ADC capture {}", path.display()))
    }

    pub fn execute(&self) -> anyhow::Result<ProcessingReport> {
        self.config.validate()?;
        let radar = self.config.radar_config()?;
        let pipeline = Pipeline::new(radar);
        let tensor = self.load_tensor(&pipeline)?;

        let output = if self.config.workers > 1 {
            let runtime = TokioBuilder::new_multi_thread()
                .worker_threads(self.config.workers)
                .build()
                .context("creating runtime for frame workers")?;
            runtime.block_on(pipeline.run_parallel(&tensor, self.config.workers))
        } else {
            pipeline.run(&tensor)
        }
        .context("running range-Doppler pipeline")?;

        Ok(ProcessingReport::from_output(
            &output,
            pipeline.normalizer().floor_db(),
            pipeline.metrics().snapshot(),
        ))
    }

    pub fn write_report<P: AsRef<Path>>(
        &self,
        report: &ProcessingReport,
        path: P,
    ) -> anyhow::Result<()> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating report directory {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string(report).context("serializing processing report")?;
        fs::write(path_ref, json)
            .with_context(|| format!("writing report {}", path_ref.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::capture::{encode_le, GeneratorConfig};
    use fmcwcore::radar::RadarParameters;
    use fmcwcore::FmcwError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn workflow(frames: usize, workers: usize) -> WorkflowConfig {
        WorkflowConfig {
            radar: RadarParameters {
                start_freq_ghz: 77.0,
                slope_mhz_per_us: 29.982,
                idle_time_us: 100.0,
                ramp_end_time_us: 60.0,
                adc_sample_rate_ksps: 10_000.0,
                adc_samples: 64,
                chirps_per_frame: 16,
                frames,
            },
            input: None,
            output: "unused.json".into(),
            workers,
            synthetic: None,
        }
    }

    #[test]
    fn synthetic_target_is_located() {
        let mut cfg = workflow(2, 1);
        let radar = cfg.radar_config().unwrap();
        let params = fmcwcore::DerivedParameters::derive(&radar);
        cfg.synthetic = Some(GeneratorConfig {
            range_m: params.range_axis[12],
            velocity_mps: params.velocity_axis[5],
            noise: 5.0,
            ..Default::default()
        });

        let report = Runner::new(cfg).execute().unwrap();
        assert_eq!(report.frames.len(), 2);
        assert_eq!(report.frames_processed, 2);
        for frame in &report.frames {
            assert_eq!(frame.range_doppler_db.len(), 32);
            assert_eq!(frame.range_doppler_db[0].len(), 16);
            let peak = frame.peak.as_ref().unwrap();
            assert!((peak.range_m - params.range_axis[12]).abs() <= params.range_bin_spacing_m);
            assert!((peak.velocity_mps - params.velocity_axis[5]).abs() < 1e-9);
        }
    }

    #[test]
    fn capture_file_runs_in_parallel() {
        let mut cfg = workflow(3, 2);
        let radar = cfg.radar_config().unwrap();
        let stream = build_capture(&radar, &GeneratorConfig::default()).unwrap();
        let mut capture = NamedTempFile::new().unwrap();
        capture.write_all(&encode_le(&stream)).unwrap();
        cfg.input = Some(capture.path().to_path_buf());

        let runner = Runner::new(cfg);
        let report = runner.execute().unwrap();
        assert_eq!(report.frames.len(), 3);
        assert_eq!(report.averaged_range_profile_db.len(), 32);

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("report.json");
        runner.write_report(&report, &out).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(parsed["frames"].as_array().unwrap().len(), 3);
        assert!(parsed["params"]["range_axis"].is_array());
    }

    #[test]
    fn truncated_capture_reports_size_mismatch() {
        let mut cfg = workflow(1, 1);
        let mut capture = NamedTempFile::new().unwrap();
        capture.write_all(&[0u8; 100]).unwrap();
        cfg.input = Some(capture.path().to_path_buf());

        let err = Runner::new(cfg).execute().unwrap_err();
        let mismatch = err.downcast_ref::<FmcwError>().unwrap();
        assert_eq!(
            *mismatch,
            FmcwError::SizeMismatch {
                expected: 2 * 64 * 16,
                observed: 50
            }
        );
    }

    #[test]
    fn missing_input_is_reported() {
        let err = Runner::new(workflow(1, 1)).execute().unwrap_err();
        assert!(err.to_string().contains("neither an input"));
    }

    #[test]
    fn capture_and_synthetic_target_together_are_refused() {
        let mut cfg = workflow(1, 1);
        cfg.input = Some("capture.bin".into());
        cfg.synthetic = Some(GeneratorConfig::default());
        let err = Runner::new(cfg).execute().unwrap_err();
        assert!(err.to_string().contains("both input"));
    }
}
